pub mod admin_stats;
pub mod crops;
pub mod subscriptions;
