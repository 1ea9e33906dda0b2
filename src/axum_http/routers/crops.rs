use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    domain::{
        repositories::{
            crops::CropRepository, subscriptions::SubscriptionRepository, users::UserRepository,
        },
        value_objects::crops::{CropDto, InsertCropModel, UpdateCropModel},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            crops::CropPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
    usecases::crops::CropUseCase,
};

#[derive(Debug, Serialize)]
pub struct CropsListResponse {
    pub crops: Vec<CropDto>,
}

#[derive(Debug, Serialize)]
pub struct CropMutationResponse {
    pub success: bool,
    pub crop: CropDto,
}

#[derive(Debug, Serialize)]
pub struct CropDeletedResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CropsClearedResponse {
    pub success: bool,
    pub message: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let crop_repository = CropPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));

    let usecase = CropUseCase::new(
        Arc::new(crop_repository),
        Arc::new(subscription_repository),
        Arc::new(user_repository),
    );

    Router::new()
        .route("/", get(list_crops))
        .route("/", post(add_crop))
        .route("/", delete(delete_all_crops))
        .route("/:crop_id", put(update_crop))
        .route("/:crop_id", delete(delete_crop))
        .route("/user/:user_id", get(list_crops_for_user))
        .with_state(Arc::new(usecase))
}

pub async fn list_crops<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "crops: list request received");
    match usecase.list_crops(user_id).await {
        Ok(crops) => Json(CropsListResponse { crops }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn add_crop<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(crop): Json<InsertCropModel>,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "crops: create request received");
    match usecase.add_crop(user_id, crop).await {
        Ok(crop) => (
            StatusCode::CREATED,
            Json(CropMutationResponse {
                success: true,
                crop,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_crop<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    Path(crop_id): Path<Uuid>,
    AuthUser { user_id, .. }: AuthUser,
    Json(changes): Json<UpdateCropModel>,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, %crop_id, "crops: update request received");
    match usecase.update_crop(user_id, crop_id, changes).await {
        Ok(crop) => Json(CropMutationResponse {
            success: true,
            crop,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_crop<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    Path(crop_id): Path<Uuid>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, %crop_id, "crops: delete request received");
    match usecase.delete_crop(user_id, crop_id).await {
        Ok(()) => Json(CropDeletedResponse { success: true }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_all_crops<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "crops: delete-all request received");
    match usecase.delete_all_crops(user_id).await {
        Ok(deleted) => Json(CropsClearedResponse {
            success: true,
            message: format!("Deleted {} crops", deleted),
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_crops_for_user<C, S, U>(
    State(usecase): State<Arc<CropUseCase<C, S, U>>>,
    Path(user_id): Path<Uuid>,
    AuthUser {
        user_id: requester_id,
        ..
    }: AuthUser,
) -> impl IntoResponse
where
    C: CropRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%requester_id, target_user_id = %user_id, "crops: admin listing request received");
    match usecase.list_crops_for_user(requester_id, user_id).await {
        Ok(crops) => Json(CropsListResponse { crops }).into_response(),
        Err(err) => err.into_response(),
    }
}
