pub mod plan_durations;
pub mod plan_tiers;
pub mod subscription_statuses;
pub mod user_roles;
