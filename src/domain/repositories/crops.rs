use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::crops::{CropChangesetEntity, CropEntity, InsertCropEntity};

#[async_trait]
#[automock]
pub trait CropRepository {
    /// Crops for one user, newest first.
    async fn list_by_user_id(&self, user_id: Uuid) -> Result<Vec<CropEntity>>;

    /// Case-insensitive name lookup scoped to the owner, used to
    /// reject duplicate crop names.
    async fn find_by_name_for_user(&self, user_id: Uuid, name: &str)
    -> Result<Option<CropEntity>>;

    async fn insert(&self, crop: InsertCropEntity) -> Result<CropEntity>;

    /// Applies the changeset to the crop only when it belongs to the
    /// given user; `None` when no such row exists.
    async fn update_owned(
        &self,
        crop_id: Uuid,
        user_id: Uuid,
        changes: CropChangesetEntity,
    ) -> Result<Option<CropEntity>>;

    /// Deletes the crop only when it belongs to the given user and
    /// reports how many rows went away.
    async fn delete_owned(&self, crop_id: Uuid, user_id: Uuid) -> Result<usize>;

    async fn delete_all_by_user_id(&self, user_id: Uuid) -> Result<usize>;
}
