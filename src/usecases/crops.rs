use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::crops::{CropChangesetEntity, InsertCropEntity},
    repositories::{
        crops::CropRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    value_objects::{
        crop_access::CropAccess,
        crops::{
            CropDto, DEFAULT_QUANTITY, DEFAULT_STATUS, DEFAULT_STOCK, InsertCropModel,
            UpdateCropModel,
        },
        enums::user_roles::UserRole,
    },
};

#[derive(Debug, Error)]
pub enum CropError {
    #[error("{0}")]
    AccessDenied(&'static str),
    #[error("Crop name is required")]
    MissingName,
    #[error("A crop with this name already exists")]
    DuplicateName,
    #[error("No valid fields to update")]
    NoFieldsToUpdate,
    #[error("Crop not found or unauthorized")]
    NotFound,
    #[error("Admin access required")]
    AdminRequired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CropError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CropError::AccessDenied(_) | CropError::AdminRequired => StatusCode::FORBIDDEN,
            CropError::MissingName | CropError::DuplicateName | CropError::NoFieldsToUpdate => {
                StatusCode::BAD_REQUEST
            }
            CropError::NotFound => StatusCode::NOT_FOUND,
            CropError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type CropResult<T> = std::result::Result<T, CropError>;

pub struct CropUseCase<C, S, U>
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    crop_repo: Arc<C>,
    subscription_repo: Arc<S>,
    user_repo: Arc<U>,
}

impl<C, S, U> CropUseCase<C, S, U>
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(crop_repo: Arc<C>, subscription_repo: Arc<S>, user_repo: Arc<U>) -> Self {
        Self {
            crop_repo,
            subscription_repo,
            user_repo,
        }
    }

    /// Reads are never gated; a farmer keeps seeing their crops after
    /// the subscription lapses, they just cannot change them.
    pub async fn list_crops(&self, user_id: Uuid) -> CropResult<Vec<CropDto>> {
        info!(%user_id, "crops: listing crops");
        let crops = self
            .crop_repo
            .list_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "crops: failed to list crops");
                CropError::Internal(err)
            })?;

        Ok(crops.into_iter().map(CropDto::from).collect())
    }

    pub async fn add_crop(&self, user_id: Uuid, crop: InsertCropModel) -> CropResult<CropDto> {
        self.ensure_crop_access(user_id).await?;

        let name = match crop.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                let err = CropError::MissingName;
                warn!(
                    %user_id,
                    status = err.status_code().as_u16(),
                    "crops: create rejected, name missing"
                );
                return Err(err);
            }
        };

        let duplicate = self
            .crop_repo
            .find_by_name_for_user(user_id, &name)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "crops: failed to check for duplicate crop name"
                );
                CropError::Internal(err)
            })?;

        if duplicate.is_some() {
            let err = CropError::DuplicateName;
            warn!(
                %user_id,
                crop_name = %name,
                status = err.status_code().as_u16(),
                "crops: create rejected, duplicate name"
            );
            return Err(err);
        }

        let now = Utc::now();
        let saved = self
            .crop_repo
            .insert(InsertCropEntity {
                id: Uuid::new_v4(),
                user_id,
                name,
                quantity: crop.quantity.unwrap_or_else(|| DEFAULT_QUANTITY.to_string()),
                stock: crop.stock.unwrap_or(DEFAULT_STOCK),
                status: crop.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "crops: failed to insert crop");
                CropError::Internal(err)
            })?;

        info!(%user_id, crop_id = %saved.id, "crops: crop created");
        Ok(CropDto::from(saved))
    }

    pub async fn update_crop(
        &self,
        user_id: Uuid,
        crop_id: Uuid,
        changes: UpdateCropModel,
    ) -> CropResult<CropDto> {
        self.ensure_crop_access(user_id).await?;

        if changes.is_empty() {
            let err = CropError::NoFieldsToUpdate;
            warn!(
                %user_id,
                %crop_id,
                status = err.status_code().as_u16(),
                "crops: update rejected, no fields"
            );
            return Err(err);
        }

        let updated = self
            .crop_repo
            .update_owned(
                crop_id,
                user_id,
                CropChangesetEntity {
                    name: changes.name,
                    quantity: changes.quantity,
                    stock: changes.stock,
                    status: changes.status,
                    updated_at: Utc::now(),
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, %crop_id, db_error = ?err, "crops: failed to update crop");
                CropError::Internal(err)
            })?;

        match updated {
            Some(crop) => {
                info!(%user_id, %crop_id, "crops: crop updated");
                Ok(CropDto::from(crop))
            }
            None => {
                let err = CropError::NotFound;
                warn!(
                    %user_id,
                    %crop_id,
                    status = err.status_code().as_u16(),
                    "crops: update target not found or not owned"
                );
                Err(err)
            }
        }
    }

    pub async fn delete_crop(&self, user_id: Uuid, crop_id: Uuid) -> CropResult<()> {
        self.ensure_crop_access(user_id).await?;

        let deleted = self
            .crop_repo
            .delete_owned(crop_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %crop_id, db_error = ?err, "crops: failed to delete crop");
                CropError::Internal(err)
            })?;

        if deleted == 0 {
            let err = CropError::NotFound;
            warn!(
                %user_id,
                %crop_id,
                status = err.status_code().as_u16(),
                "crops: delete target not found or not owned"
            );
            return Err(err);
        }

        info!(%user_id, %crop_id, "crops: crop deleted");
        Ok(())
    }

    pub async fn delete_all_crops(&self, user_id: Uuid) -> CropResult<usize> {
        self.ensure_crop_access(user_id).await?;

        let deleted = self
            .crop_repo
            .delete_all_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "crops: failed to delete all crops");
                CropError::Internal(err)
            })?;

        info!(%user_id, deleted, "crops: all crops deleted");
        Ok(deleted)
    }

    pub async fn list_crops_for_user(
        &self,
        requester_id: Uuid,
        target_user_id: Uuid,
    ) -> CropResult<Vec<CropDto>> {
        self.ensure_admin(requester_id).await?;

        let crops = self
            .crop_repo
            .list_by_user_id(target_user_id)
            .await
            .map_err(|err| {
                error!(
                    %requester_id,
                    %target_user_id,
                    db_error = ?err,
                    "crops: failed to list crops for user"
                );
                CropError::Internal(err)
            })?;

        let crop_count = crops.len();
        info!(
            %requester_id,
            %target_user_id,
            crop_count,
            "crops: admin listed user crops"
        );

        Ok(crops.into_iter().map(CropDto::from).collect())
    }

    /// Evaluated fresh on every mutation; denials surface the gate's
    /// reason string unchanged.
    async fn ensure_crop_access(&self, user_id: Uuid) -> CropResult<()> {
        let subscription = self
            .subscription_repo
            .find_by_user_id(user_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    db_error = ?err,
                    "crops: failed to load subscription for access check"
                );
                CropError::Internal(err)
            })?;

        if let CropAccess::Denied { reason } = CropAccess::evaluate(subscription.as_ref(), Utc::now())
        {
            let err = CropError::AccessDenied(reason);
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                reason,
                "crops: crop access denied"
            );
            return Err(err);
        }

        Ok(())
    }

    async fn ensure_admin(&self, user_id: Uuid) -> CropResult<()> {
        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "crops: failed to load user for role check");
            CropError::Internal(err)
        })?;

        let is_admin = user
            .map(|user| UserRole::from_str(&user.role) == UserRole::Admin)
            .unwrap_or(false);

        if !is_admin {
            let err = CropError::AdminRequired;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "crops: admin access required"
            );
            return Err(err);
        }

        Ok(())
    }
}
