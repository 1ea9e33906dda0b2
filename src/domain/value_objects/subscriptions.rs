use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::{subscriptions::SubscriptionEntity, users::UserEntity},
    value_objects::enums::{
        plan_durations::PlanDuration, subscription_statuses::SubscriptionStatus,
    },
};

pub const TRIAL_PLAN_ID: &str = "trial";

/// Paid plans start after a fixed grace window. The offset is applied on
/// every paid purchase, renewals included.
pub const PAID_PLAN_GRACE_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChangeModel {
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// The lifecycle fields derived for one plan change. Pure and total: an
/// unrecognized duration label collapses the period to zero length
/// instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSchedule {
    pub status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl SubscriptionSchedule {
    pub fn compute(
        plan_id: &str,
        price: f64,
        duration: &str,
        has_existing: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let is_free_trial = plan_id == TRIAL_PLAN_ID || price == 0.0;

        let start_date = if is_free_trial {
            now
        } else {
            now + Duration::days(PAID_PLAN_GRACE_DAYS)
        };

        let end_date = PlanDuration::from_str(duration)
            .map(|plan_duration| plan_duration.end_date_from(start_date))
            .unwrap_or(start_date);

        let status = if is_free_trial {
            SubscriptionStatus::Trial
        } else if has_existing {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Trial
        };

        let trial_ends_at = if is_free_trial {
            Some(end_date)
        } else if has_existing {
            None
        } else {
            Some(start_date)
        };

        Self {
            status,
            trial_ends_at,
            start_date,
            end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDto {
    pub user_id: Uuid,
    pub plan_id: String,
    pub plan_name: String,
    pub price: f64,
    pub duration: String,
    pub status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionDto {
    fn from(entity: SubscriptionEntity) -> Self {
        Self {
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            plan_name: entity.plan_name,
            price: entity.price,
            duration: entity.duration,
            status: SubscriptionStatus::from_str(&entity.status),
            trial_ends_at: entity.trial_ends_at,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Admin listing row: the subscription joined with the owning user's
/// identity fields. Users can be deleted out from under their rows, so
/// the identity side falls back to empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminSubscriptionDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub plan_name: String,
    pub price: f64,
    pub duration: String,
    pub status: SubscriptionStatus,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub full_name: String,
    pub farm_name: String,
}

impl From<(SubscriptionEntity, Option<UserEntity>)> for AdminSubscriptionDto {
    fn from((entity, user): (SubscriptionEntity, Option<UserEntity>)) -> Self {
        let (email, full_name, farm_name) = match user {
            Some(user) => (
                user.email,
                user.full_name,
                user.farm_name.unwrap_or_default(),
            ),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_id: entity.plan_id,
            plan_name: entity.plan_name,
            price: entity.price,
            duration: entity.duration,
            status: SubscriptionStatus::from_str(&entity.status),
            trial_ends_at: entity.trial_ends_at,
            start_date: entity.start_date,
            end_date: entity.end_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            email,
            full_name,
            farm_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
    }

    #[test]
    fn trial_plan_starts_immediately_and_ends_with_the_trial() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("trial", 0.0, "2 weeks", false, now);

        assert_eq!(schedule.status, SubscriptionStatus::Trial);
        assert_eq!(schedule.start_date, now);
        assert_eq!(schedule.end_date, now + Duration::days(14));
        assert_eq!(schedule.trial_ends_at, Some(schedule.end_date));
    }

    #[test]
    fn zero_price_plan_counts_as_free_trial_regardless_of_plan_id() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("basic-free", 0.0, "1 month", true, now);

        assert_eq!(schedule.status, SubscriptionStatus::Trial);
        assert_eq!(schedule.start_date, now);
        assert_eq!(schedule.trial_ends_at, Some(schedule.end_date));
    }

    #[test]
    fn first_paid_subscription_gets_grace_start_and_trial_status() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("basic", 299.0, "1 month", false, now);

        assert_eq!(schedule.status, SubscriptionStatus::Trial);
        assert_eq!(schedule.start_date, now + Duration::days(7));
        assert_eq!(schedule.end_date, at(2025, 4, 8));
        assert_eq!(schedule.trial_ends_at, Some(schedule.start_date));
    }

    #[test]
    fn paid_renewal_is_active_with_no_trial_marker() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("pro", 999.0, "6 months", true, now);

        assert_eq!(schedule.status, SubscriptionStatus::Active);
        assert_eq!(schedule.start_date, now + Duration::days(7));
        assert_eq!(schedule.end_date, at(2025, 9, 8));
        assert_eq!(schedule.trial_ends_at, None);
    }

    #[test]
    fn paid_renewal_still_carries_the_grace_offset() {
        // The grace window is not a first-purchase perk; renewals are
        // pushed out by the same seven days.
        let now = at(2025, 6, 15);
        let schedule = SubscriptionSchedule::compute("premium", 1999.0, "1 year", true, now);

        assert_eq!(schedule.start_date, now + Duration::days(7));
    }

    #[test]
    fn unknown_duration_collapses_the_period() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("trial", 0.0, "3 fortnights", false, now);

        assert_eq!(schedule.end_date, schedule.start_date);
    }

    #[test]
    fn month_arithmetic_clamps_at_month_end() {
        let now = at(2025, 1, 31);
        let schedule = SubscriptionSchedule::compute("trial", 0.0, "1 month", false, now);

        assert_eq!(schedule.end_date, at(2025, 2, 28));
    }

    #[test]
    fn year_arithmetic_clamps_leap_day() {
        let now = at(2024, 2, 29);
        let schedule = SubscriptionSchedule::compute("trial", 0.0, "1 year", false, now);

        assert_eq!(schedule.end_date, at(2025, 2, 28));
    }

    #[test]
    fn two_week_duration_is_exactly_fourteen_days() {
        let now = at(2025, 3, 1);
        let schedule = SubscriptionSchedule::compute("basic", 299.0, "2 weeks", true, now);

        assert_eq!(schedule.end_date - schedule.start_date, Duration::days(14));
    }

    #[test]
    fn unknown_status_text_maps_to_expired_in_the_dto() {
        let now = at(2025, 3, 1);
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: "basic".to_string(),
            plan_name: "Basic Plan".to_string(),
            price: 299.0,
            duration: "1 month".to_string(),
            status: "suspended".to_string(),
            trial_ends_at: None,
            start_date: now,
            end_date: now + Duration::days(30),
            created_at: now,
            updated_at: now,
        };

        let dto = SubscriptionDto::from(entity);
        assert_eq!(dto.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn admin_dto_blanks_identity_for_missing_user() {
        let now = at(2025, 3, 1);
        let entity = SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: "pro".to_string(),
            plan_name: "Pro Plan".to_string(),
            price: 999.0,
            duration: "6 months".to_string(),
            status: "active".to_string(),
            trial_ends_at: None,
            start_date: now,
            end_date: now + Duration::days(180),
            created_at: now,
            updated_at: now,
        };

        let dto = AdminSubscriptionDto::from((entity, None));
        assert_eq!(dto.email, "");
        assert_eq!(dto.full_name, "");
        assert_eq!(dto.farm_name, "");
    }

    #[test]
    fn plan_change_model_tolerates_missing_fields() {
        let model: PlanChangeModel = serde_json::from_str(r#"{"planId":"trial"}"#).unwrap();
        assert_eq!(model.plan_id.as_deref(), Some("trial"));
        assert_eq!(model.plan_name, None);
        assert_eq!(model.price, None);
        assert_eq!(model.duration, None);
    }
}
