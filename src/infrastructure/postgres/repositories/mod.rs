pub mod crops;
pub mod subscriptions;
pub mod users;
