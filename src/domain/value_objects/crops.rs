use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::crops::CropEntity;

pub const DEFAULT_QUANTITY: &str = "0";
pub const DEFAULT_STOCK: i32 = 0;
pub const DEFAULT_STATUS: &str = "Good";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCropModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCropModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl UpdateCropModel {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.stock.is_none()
            && self.status.is_none()
    }
}

/// Wire shape for a crop row. The owner is implied by the authenticated
/// caller (or the admin's path parameter), so `user_id` never leaves the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropDto {
    pub id: Uuid,
    pub name: String,
    pub quantity: String,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CropEntity> for CropDto {
    fn from(entity: CropEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            quantity: entity.quantity,
            stock: entity.stock,
            status: entity.status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn update_model_with_no_fields_is_empty() {
        let model: UpdateCropModel = serde_json::from_str("{}").unwrap();
        assert!(model.is_empty());

        let model: UpdateCropModel = serde_json::from_str(r#"{"stock": 3}"#).unwrap();
        assert!(!model.is_empty());
    }

    #[test]
    fn insert_model_tolerates_missing_fields() {
        let model: InsertCropModel = serde_json::from_str(r#"{"name":"Wheat"}"#).unwrap();
        assert_eq!(model.name.as_deref(), Some("Wheat"));
        assert_eq!(model.quantity, None);
        assert_eq!(model.stock, None);
        assert_eq!(model.status, None);
    }

    #[test]
    fn crop_dto_serializes_camel_case() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let dto = CropDto::from(CropEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Wheat".to_string(),
            quantity: "2 tons".to_string(),
            stock: 5,
            status: "Good".to_string(),
            created_at: now,
            updated_at: now,
        });

        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("userId").is_none());
        assert!(value.get("user_id").is_none());
    }
}
