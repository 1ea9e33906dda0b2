use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::UpsertSubscriptionEntity,
    repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
    value_objects::{
        enums::user_roles::UserRole,
        subscriptions::{
            AdminSubscriptionDto, PlanChangeModel, SubscriptionDto, SubscriptionSchedule,
        },
    },
};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("Plan details are required")]
    MissingPlanFields,
    #[error("Admin access required")]
    AdminRequired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::MissingPlanFields => StatusCode::BAD_REQUEST,
            SubscriptionError::AdminRequired => StatusCode::FORBIDDEN,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<S, U> SubscriptionUseCase<S, U>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            subscription_repo,
            user_repo,
        }
    }

    pub async fn get_current_subscription(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<SubscriptionDto>> {
        info!(%user_id, "subscriptions: loading current subscription");
        let subscription = self
            .subscription_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load current subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        Ok(subscription.map(SubscriptionDto::from))
    }

    /// Derives the lifecycle fields for the requested plan and upserts
    /// the user's single subscription row. A missing price is treated
    /// as zero, which makes the plan a free trial.
    pub async fn change_plan(
        &self,
        user_id: Uuid,
        plan_change: PlanChangeModel,
    ) -> UseCaseResult<SubscriptionDto> {
        let (plan_id, plan_name) = match (plan_change.plan_id, plan_change.plan_name) {
            (Some(plan_id), Some(plan_name)) if !plan_id.is_empty() && !plan_name.is_empty() => {
                (plan_id, plan_name)
            }
            _ => {
                let err = SubscriptionError::MissingPlanFields;
                warn!(
                    %user_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: plan change rejected, plan details missing"
                );
                return Err(err);
            }
        };

        let price = plan_change.price.unwrap_or(0.0);
        let duration = plan_change.duration.unwrap_or_default();

        let existing = self
            .subscription_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to load subscription before plan change"
                );
                SubscriptionError::Internal(err)
            })?;

        let now = Utc::now();
        let schedule =
            SubscriptionSchedule::compute(&plan_id, price, &duration, existing.is_some(), now);

        info!(
            %user_id,
            plan_id = %plan_id,
            status = %schedule.status,
            start_date = %schedule.start_date,
            end_date = %schedule.end_date,
            "subscriptions: applying plan change"
        );

        let saved = self
            .subscription_repo
            .upsert(UpsertSubscriptionEntity {
                id: Uuid::new_v4(),
                user_id,
                plan_id,
                plan_name,
                price,
                duration,
                status: schedule.status.to_string(),
                trial_ends_at: schedule.trial_ends_at,
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "subscriptions: failed to store plan change"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(%user_id, subscription_id = %saved.id, "subscriptions: plan change stored");
        Ok(SubscriptionDto::from(saved))
    }

    pub async fn list_all_subscriptions(
        &self,
        requester_id: Uuid,
    ) -> UseCaseResult<Vec<AdminSubscriptionDto>> {
        self.ensure_admin(requester_id).await?;

        let rows = self
            .subscription_repo
            .list_all_with_users()
            .await
            .map_err(|err| {
                error!(
                    %requester_id,
                    db_error = ?err,
                    "subscriptions: failed to load admin subscription listing"
                );
                SubscriptionError::Internal(err)
            })?;

        let subscription_count = rows.len();
        info!(
            %requester_id,
            subscription_count,
            "subscriptions: admin listing loaded"
        );

        Ok(rows.into_iter().map(AdminSubscriptionDto::from).collect())
    }

    /// Role checks read the users table rather than trusting anything
    /// carried in the token.
    async fn ensure_admin(&self, user_id: Uuid) -> UseCaseResult<()> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(
                %user_id,
                db_error = ?err,
                "subscriptions: failed to load user for role check"
            );
            SubscriptionError::Internal(err)
        })?;

        let is_admin = user
            .map(|user| UserRole::from_str(&user.role) == UserRole::Admin)
            .unwrap_or(false);

        if !is_admin {
            let err = SubscriptionError::AdminRequired;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "subscriptions: admin access required"
            );
            return Err(err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::{
        entities::{subscriptions::SubscriptionEntity, users::UserEntity},
        repositories::{
            subscriptions::MockSubscriptionRepository, users::MockUserRepository,
        },
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    };

    fn sample_subscription(user_id: Uuid, status: &str) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id: "basic".to_string(),
            plan_name: "Basic Plan".to_string(),
            price: 299.0,
            duration: "1 month".to_string(),
            status: status.to_string(),
            trial_ends_at: None,
            start_date: now,
            end_date: now + Duration::days(30),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_user(id: Uuid, role: &str) -> UserEntity {
        UserEntity {
            id,
            email: "farmer@example.com".to_string(),
            full_name: "Aya Farmer".to_string(),
            farm_name: Some("Green Acres".to_string()),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    fn saved_from_upsert(entity: &UpsertSubscriptionEntity) -> SubscriptionEntity {
        SubscriptionEntity {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id.clone(),
            plan_name: entity.plan_name.clone(),
            price: entity.price,
            duration: entity.duration.clone(),
            status: entity.status.clone(),
            trial_ends_at: entity.trial_ends_at,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    #[tokio::test]
    async fn change_plan_rejects_missing_plan_fields() {
        let subscription_repo = MockSubscriptionRepository::new();
        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let err = usecase
            .change_plan(
                Uuid::new_v4(),
                PlanChangeModel {
                    plan_id: Some("basic".to_string()),
                    plan_name: None,
                    price: Some(299.0),
                    duration: Some("1 month".to_string()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::MissingPlanFields));
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.to_string(), "Plan details are required");
    }

    #[tokio::test]
    async fn change_plan_rejects_blank_plan_id() {
        let subscription_repo = MockSubscriptionRepository::new();
        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let err = usecase
            .change_plan(
                Uuid::new_v4(),
                PlanChangeModel {
                    plan_id: Some(String::new()),
                    plan_name: Some("Basic Plan".to_string()),
                    price: None,
                    duration: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::MissingPlanFields));
    }

    #[tokio::test]
    async fn first_paid_plan_change_is_stored_as_trial_with_grace_start() {
        let user_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_user_id()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));
        subscription_repo
            .expect_upsert()
            .withf(move |entity| {
                entity.user_id == user_id
                    && entity.status == "trial"
                    && entity.trial_ends_at == Some(entity.start_date)
                    && entity.end_date - entity.start_date == Duration::days(14)
            })
            .returning(|entity| {
                let saved = saved_from_upsert(&entity);
                Box::pin(async move { Ok(saved) })
            });

        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let dto = usecase
            .change_plan(
                user_id,
                PlanChangeModel {
                    plan_id: Some("basic".to_string()),
                    plan_name: Some("Basic Plan".to_string()),
                    price: Some(299.0),
                    duration: Some("2 weeks".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.status, SubscriptionStatus::Trial);
        assert_eq!(dto.trial_ends_at, Some(dto.start_date));
    }

    #[tokio::test]
    async fn paid_renewal_is_stored_active_without_trial_marker() {
        let user_id = Uuid::new_v4();
        let existing = sample_subscription(user_id, "trial");

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_user_id()
            .with(eq(user_id))
            .returning(move |_| {
                let existing = existing.clone();
                Box::pin(async move { Ok(Some(existing)) })
            });
        subscription_repo
            .expect_upsert()
            .withf(|entity| entity.status == "active" && entity.trial_ends_at.is_none())
            .returning(|entity| {
                let saved = saved_from_upsert(&entity);
                Box::pin(async move { Ok(saved) })
            });

        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let dto = usecase
            .change_plan(
                user_id,
                PlanChangeModel {
                    plan_id: Some("pro".to_string()),
                    plan_name: Some("Pro Plan".to_string()),
                    price: Some(999.0),
                    duration: Some("6 months".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.status, SubscriptionStatus::Active);
        assert_eq!(dto.trial_ends_at, None);
    }

    #[tokio::test]
    async fn missing_price_defaults_to_free_trial() {
        let user_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_user_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        subscription_repo
            .expect_upsert()
            .withf(|entity| {
                entity.price == 0.0
                    && entity.status == "trial"
                    && entity.trial_ends_at == Some(entity.end_date)
            })
            .returning(|entity| {
                let saved = saved_from_upsert(&entity);
                Box::pin(async move { Ok(saved) })
            });

        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let dto = usecase
            .change_plan(
                user_id,
                PlanChangeModel {
                    plan_id: Some("starter".to_string()),
                    plan_name: Some("Starter".to_string()),
                    price: None,
                    duration: Some("2 weeks".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.price, 0.0);
        assert_eq!(dto.status, SubscriptionStatus::Trial);
    }

    #[tokio::test]
    async fn store_failure_maps_to_internal() {
        let user_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_user_id()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection reset")) }));

        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let err = usecase.get_current_subscription(user_id).await.unwrap_err();
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[tokio::test]
    async fn list_all_subscriptions_requires_admin_role() {
        let requester_id = Uuid::new_v4();

        let subscription_repo = MockSubscriptionRepository::new();
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(requester_id))
            .returning(move |id| {
                let user = sample_user(id, "farmer");
                Box::pin(async move { Ok(Some(user)) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let err = usecase
            .list_all_subscriptions(requester_id)
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::AdminRequired));
        assert_eq!(err.status_code().as_u16(), 403);
    }

    #[tokio::test]
    async fn list_all_subscriptions_joins_user_identity() {
        let requester_id = Uuid::new_v4();
        let with_user = sample_subscription(Uuid::new_v4(), "active");
        let orphaned = sample_subscription(Uuid::new_v4(), "trial");
        let owner = sample_user(with_user.user_id, "farmer");

        let mut subscription_repo = MockSubscriptionRepository::new();
        let rows = vec![
            (with_user.clone(), Some(owner.clone())),
            (orphaned.clone(), None),
        ];
        subscription_repo
            .expect_list_all_with_users()
            .returning(move || {
                let rows = rows.clone();
                Box::pin(async move { Ok(rows) })
            });

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(requester_id))
            .returning(move |id| {
                let admin = sample_user(id, "admin");
                Box::pin(async move { Ok(Some(admin)) })
            });

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let listing = usecase.list_all_subscriptions(requester_id).await.unwrap();

        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].email, "farmer@example.com");
        assert_eq!(listing[0].farm_name, "Green Acres");
        assert_eq!(listing[1].email, "");
        assert_eq!(listing[1].full_name, "");
    }

    #[tokio::test]
    async fn unknown_requester_is_not_admin() {
        let requester_id = Uuid::new_v4();

        let subscription_repo = MockSubscriptionRepository::new();
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let err = usecase
            .list_all_subscriptions(requester_id)
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::AdminRequired));
    }

    #[tokio::test]
    async fn get_current_subscription_passes_through_absence() {
        let user_id = Uuid::new_v4();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_user_id()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));

        let user_repo = MockUserRepository::new();
        let usecase = SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(user_repo));

        let current = usecase.get_current_subscription(user_id).await.unwrap();
        assert_eq!(current, None);
    }
}
