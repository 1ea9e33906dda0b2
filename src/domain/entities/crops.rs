use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::crops;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = crops)]
pub struct CropEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crops)]
pub struct InsertCropEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Allow-listed update set for a crop row. `None` fields are left untouched;
/// `updated_at` is always stamped so the changeset is never empty.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = crops)]
pub struct CropChangesetEntity {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub stock: Option<i32>,
    pub status: Option<String>,
    pub updated_at: DateTime<Utc>,
}
