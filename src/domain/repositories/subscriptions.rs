use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    subscriptions::{SubscriptionEntity, UpsertSubscriptionEntity},
    users::UserEntity,
};

#[async_trait]
#[automock]
pub trait SubscriptionRepository {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>>;

    /// Insert-or-update keyed on the unique `user_id` column; the row
    /// id assigned on first insert survives every later plan change.
    async fn upsert(&self, subscription: UpsertSubscriptionEntity) -> Result<SubscriptionEntity>;

    async fn list_all(&self) -> Result<Vec<SubscriptionEntity>>;

    /// Newest-first listing joined with the owning user, for the admin
    /// surface. The user side is optional because rows can outlive
    /// their owner.
    async fn list_all_with_users(&self)
    -> Result<Vec<(SubscriptionEntity, Option<UserEntity>)>>;
}
