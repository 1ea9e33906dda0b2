use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, define_sql_function, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::crops::{CropChangesetEntity, CropEntity, InsertCropEntity},
        repositories::crops::CropRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::crops},
};

define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

pub struct CropPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CropPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CropRepository for CropPostgres {
    async fn list_by_user_id(&self, user_id: Uuid) -> Result<Vec<CropEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = crops::table
            .filter(crops::user_id.eq(user_id))
            .select(CropEntity::as_select())
            .order(crops::created_at.desc())
            .load::<CropEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_name_for_user(
        &self,
        user_id: Uuid,
        name: &str,
    ) -> Result<Option<CropEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = crops::table
            .filter(crops::user_id.eq(user_id))
            .filter(lower(crops::name).eq(name.to_lowercase()))
            .select(CropEntity::as_select())
            .first::<CropEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert(&self, crop: InsertCropEntity) -> Result<CropEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(crops::table)
            .values(&crop)
            .returning(CropEntity::as_returning())
            .get_result::<CropEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update_owned(
        &self,
        crop_id: Uuid,
        user_id: Uuid,
        changes: CropChangesetEntity,
    ) -> Result<Option<CropEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Ownership rides in the filter: a foreign crop id updates
        // nothing and surfaces as None.
        let result = update(crops::table)
            .filter(crops::id.eq(crop_id))
            .filter(crops::user_id.eq(user_id))
            .set(&changes)
            .returning(CropEntity::as_returning())
            .get_result::<CropEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete_owned(&self, crop_id: Uuid, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted = delete(
            crops::table
                .filter(crops::id.eq(crop_id))
                .filter(crops::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted)
    }

    async fn delete_all_by_user_id(&self, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted =
            delete(crops::table.filter(crops::user_id.eq(user_id))).execute(&mut conn)?;

        Ok(deleted)
    }
}
