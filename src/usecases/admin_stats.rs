use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    repositories::{
        crops::CropRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::{
        crop_profit::estimate_crop_profit,
        enums::{
            plan_tiers::PlanTier, subscription_statuses::SubscriptionStatus, user_roles::UserRole,
        },
    },
};

#[derive(Debug, Error)]
pub enum AdminStatsError {
    #[error("Admin access required")]
    AdminRequired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminStatsError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AdminStatsError::AdminRequired => StatusCode::FORBIDDEN,
            AdminStatsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type StatsResult<T> = std::result::Result<T, AdminStatsError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FarmersStatsDto {
    pub total_farmers: usize,
    pub subscribed_farmers: usize,
    pub total_revenue: f64,
    pub total_profit: i64,
    pub basic_plan: usize,
    pub pro_plan: usize,
    pub premium_plan: usize,
}

pub struct AdminStatsUseCase<U, S, C>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CropRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    subscription_repo: Arc<S>,
    crop_repo: Arc<C>,
}

impl<U, S, C> AdminStatsUseCase<U, S, C>
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CropRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, subscription_repo: Arc<S>, crop_repo: Arc<C>) -> Self {
        Self {
            user_repo,
            subscription_repo,
            crop_repo,
        }
    }

    /// One report over every farmer: head counts, plan tier buckets,
    /// revenue over currently-subscribed farmers, and the profit
    /// estimate summed over ALL farmers' crops regardless of
    /// subscription state.
    pub async fn farmers_stats(&self, requester_id: Uuid) -> StatsResult<FarmersStatsDto> {
        self.ensure_admin(requester_id).await?;

        let farmers = self.user_repo.list_farmers().await.map_err(|err| {
            error!(
                %requester_id,
                db_error = ?err,
                "admin_stats: failed to list farmers"
            );
            AdminStatsError::Internal(err)
        })?;

        let subscriptions = self.subscription_repo.list_all().await.map_err(|err| {
            error!(
                %requester_id,
                db_error = ?err,
                "admin_stats: failed to list subscriptions"
            );
            AdminStatsError::Internal(err)
        })?;

        let subscription_by_user: HashMap<Uuid, SubscriptionEntity> = subscriptions
            .into_iter()
            .map(|subscription| (subscription.user_id, subscription))
            .collect();

        let now = Utc::now();
        let mut subscribed_farmers = 0;
        let mut total_revenue = 0.0;
        let mut basic_plan = 0;
        let mut pro_plan = 0;
        let mut premium_plan = 0;

        for farmer in &farmers {
            let Some(subscription) = subscription_by_user.get(&farmer.id) else {
                continue;
            };
            if !Self::counts_as_subscribed(subscription, now) {
                continue;
            }

            subscribed_farmers += 1;
            total_revenue += subscription.price;

            match PlanTier::classify(&subscription.plan_name) {
                Some(PlanTier::Premium) => premium_plan += 1,
                Some(PlanTier::Pro) => pro_plan += 1,
                Some(PlanTier::Basic) => basic_plan += 1,
                None => {}
            }
        }

        // One crop fetch per farmer, in flight at the same time. A
        // failed fetch costs that farmer's profit, never the report.
        let mut join_set = JoinSet::new();
        for farmer in &farmers {
            let crop_repo = Arc::clone(&self.crop_repo);
            let farmer_id = farmer.id;
            join_set.spawn(async move {
                let profit = crop_repo.list_by_user_id(farmer_id).await.map(|crops| {
                    crops
                        .iter()
                        .map(|crop| estimate_crop_profit(&crop.quantity, &crop.name).total)
                        .sum::<i64>()
                });
                (farmer_id, profit)
            });
        }

        let mut total_profit = 0;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((_, Ok(profit))) => total_profit += profit,
                Ok((farmer_id, Err(err))) => {
                    warn!(
                        %farmer_id,
                        db_error = ?err,
                        "admin_stats: crop fetch failed, counting zero profit"
                    );
                }
                Err(err) => {
                    warn!(
                        join_error = ?err,
                        "admin_stats: crop profit task failed, counting zero profit"
                    );
                }
            }
        }

        let stats = FarmersStatsDto {
            total_farmers: farmers.len(),
            subscribed_farmers,
            total_revenue,
            total_profit,
            basic_plan,
            pro_plan,
            premium_plan,
        };

        info!(
            %requester_id,
            total_farmers = stats.total_farmers,
            subscribed_farmers = stats.subscribed_farmers,
            total_profit = stats.total_profit,
            "admin_stats: farmers stats built"
        );

        Ok(stats)
    }

    /// The dashboard's notion of "currently subscribed": status and
    /// `end_date` only. It never consults `trial_ends_at`, so it can
    /// count a farmer the crop gate is currently denying.
    fn counts_as_subscribed(subscription: &SubscriptionEntity, now: DateTime<Utc>) -> bool {
        let status = SubscriptionStatus::from_str(&subscription.status);
        matches!(
            status,
            SubscriptionStatus::Active | SubscriptionStatus::Trial
        ) && subscription.end_date >= now
    }

    async fn ensure_admin(&self, user_id: Uuid) -> StatsResult<()> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(
                %user_id,
                db_error = ?err,
                "admin_stats: failed to load user for role check"
            );
            AdminStatsError::Internal(err)
        })?;

        let is_admin = user
            .map(|user| UserRole::from_str(&user.role) == UserRole::Admin)
            .unwrap_or(false);

        if !is_admin {
            let err = AdminStatsError::AdminRequired;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "admin_stats: admin access required"
            );
            return Err(err);
        }

        Ok(())
    }
}
