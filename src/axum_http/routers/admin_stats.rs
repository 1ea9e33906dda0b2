use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tracing::info;

use crate::{
    auth::AuthUser,
    domain::repositories::{
        crops::CropRepository, subscriptions::SubscriptionRepository, users::UserRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{
            crops::CropPostgres, subscriptions::SubscriptionPostgres, users::UserPostgres,
        },
    },
    usecases::admin_stats::AdminStatsUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let crop_repository = CropPostgres::new(Arc::clone(&db_pool));

    let usecase = AdminStatsUseCase::new(
        Arc::new(user_repository),
        Arc::new(subscription_repository),
        Arc::new(crop_repository),
    );

    Router::new()
        .route("/farmers-stats", get(farmers_stats))
        .with_state(Arc::new(usecase))
}

pub async fn farmers_stats<U, S, C>(
    State(usecase): State<Arc<AdminStatsUseCase<U, S, C>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    C: CropRepository + Send + Sync + 'static,
{
    info!(%user_id, "admin_stats: farmers stats request received");
    match usecase.farmers_stats(user_id).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => err.into_response(),
    }
}
