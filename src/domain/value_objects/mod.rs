pub mod crop_access;
pub mod crop_profit;
pub mod crops;
pub mod enums;
pub mod subscriptions;
