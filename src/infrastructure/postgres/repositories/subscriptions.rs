use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*, upsert::excluded};
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            subscriptions::{SubscriptionEntity, UpsertSubscriptionEntity},
            users::UserEntity,
        },
        repositories::subscriptions::SubscriptionRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{subscriptions, users},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn upsert(&self, subscription: UpsertSubscriptionEntity) -> Result<SubscriptionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // The conflict arm leaves id and created_at alone so the row
        // identity assigned on first insert survives plan changes.
        let result = insert_into(subscriptions::table)
            .values(&subscription)
            .on_conflict(subscriptions::user_id)
            .do_update()
            .set((
                subscriptions::plan_id.eq(excluded(subscriptions::plan_id)),
                subscriptions::plan_name.eq(excluded(subscriptions::plan_name)),
                subscriptions::price.eq(excluded(subscriptions::price)),
                subscriptions::duration.eq(excluded(subscriptions::duration)),
                subscriptions::status.eq(excluded(subscriptions::status)),
                subscriptions::trial_ends_at.eq(excluded(subscriptions::trial_ends_at)),
                subscriptions::start_date.eq(excluded(subscriptions::start_date)),
                subscriptions::end_date.eq(excluded(subscriptions::end_date)),
                subscriptions::updated_at.eq(excluded(subscriptions::updated_at)),
            ))
            .returning(SubscriptionEntity::as_returning())
            .get_result::<SubscriptionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .select(SubscriptionEntity::as_select())
            .load::<SubscriptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_all_with_users(
        &self,
    ) -> Result<Vec<(SubscriptionEntity, Option<UserEntity>)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = subscriptions::table
            .left_join(users::table.on(subscriptions::user_id.eq(users::id)))
            .select((
                SubscriptionEntity::as_select(),
                Option::<UserEntity>::as_select(),
            ))
            .order(subscriptions::created_at.desc())
            .load::<(SubscriptionEntity, Option<UserEntity>)>(&mut conn)?;

        Ok(results)
    }
}
