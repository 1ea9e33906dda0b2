use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::users;

/// Account row as this core sees it. Credential columns stay with the auth
/// collaborator and are not mapped here.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub farm_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}
