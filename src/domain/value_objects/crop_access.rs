use chrono::{DateTime, Utc};

use crate::domain::{
    entities::subscriptions::SubscriptionEntity,
    value_objects::enums::subscription_statuses::SubscriptionStatus,
};

pub const REASON_NO_SUBSCRIPTION: &str = "No subscription found. Please subscribe to manage crops.";
pub const REASON_SUBSCRIPTION_EXPIRED: &str =
    "Your subscription has expired. Please renew to continue managing crops.";
pub const REASON_TRIAL_ENDED: &str =
    "Your free trial has ended. Please upgrade to continue managing crops.";
pub const REASON_NOT_ACTIVE: &str =
    "Your subscription is not active. Please subscribe to manage crops.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropAccess {
    Allowed,
    Denied { reason: &'static str },
}

impl CropAccess {
    /// First matching arm wins. The reason strings are a contract the
    /// farm UI matches on verbatim, so they must not drift.
    pub fn evaluate(subscription: Option<&SubscriptionEntity>, now: DateTime<Utc>) -> Self {
        let Some(subscription) = subscription else {
            return CropAccess::Denied {
                reason: REASON_NO_SUBSCRIPTION,
            };
        };

        if subscription.end_date < now {
            return CropAccess::Denied {
                reason: REASON_SUBSCRIPTION_EXPIRED,
            };
        }

        let status = SubscriptionStatus::from_str(&subscription.status);

        if status == SubscriptionStatus::Trial {
            if let Some(trial_ends_at) = subscription.trial_ends_at {
                if trial_ends_at < now {
                    return CropAccess::Denied {
                        reason: REASON_TRIAL_ENDED,
                    };
                }
            }
        }

        match status {
            SubscriptionStatus::Active | SubscriptionStatus::Trial => CropAccess::Allowed,
            _ => CropAccess::Denied {
                reason: REASON_NOT_ACTIVE,
            },
        }
    }
}
