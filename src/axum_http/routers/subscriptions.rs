use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

use crate::{
    auth::AuthUser,
    domain::{
        repositories::{subscriptions::SubscriptionRepository, users::UserRepository},
        value_objects::subscriptions::{AdminSubscriptionDto, PlanChangeModel, SubscriptionDto},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{subscriptions::SubscriptionPostgres, users::UserPostgres},
    },
    usecases::subscriptions::SubscriptionUseCase,
};

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionResponse {
    pub subscription: Option<SubscriptionDto>,
}

#[derive(Debug, Serialize)]
pub struct PlanChangeResponse {
    pub success: bool,
    pub subscription: SubscriptionDto,
}

#[derive(Debug, Serialize)]
pub struct AdminSubscriptionsResponse {
    pub subscriptions: Vec<AdminSubscriptionDto>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));

    let usecase = SubscriptionUseCase::new(
        Arc::new(subscription_repository),
        Arc::new(user_repository),
    );

    Router::new()
        .route("/", get(get_current_subscription))
        .route("/", post(change_plan))
        .route("/all", get(list_all_subscriptions))
        .with_state(Arc::new(usecase))
}

pub async fn get_current_subscription<S, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: current subscription request received");
    match usecase.get_current_subscription(user_id).await {
        Ok(subscription) => Json(CurrentSubscriptionResponse { subscription }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn change_plan<S, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(plan_change): Json<PlanChangeModel>,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: plan change request received");
    match usecase.change_plan(user_id, plan_change).await {
        Ok(subscription) => (
            StatusCode::CREATED,
            Json(PlanChangeResponse {
                success: true,
                subscription,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_all_subscriptions<S, U>(
    State(usecase): State<Arc<SubscriptionUseCase<S, U>>>,
    AuthUser { user_id, .. }: AuthUser,
) -> impl IntoResponse
where
    S: SubscriptionRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    info!(%user_id, "subscriptions: admin listing request received");
    match usecase.list_all_subscriptions(user_id).await {
        Ok(subscriptions) => Json(AdminSubscriptionsResponse { subscriptions }).into_response(),
        Err(err) => err.into_response(),
    }
}
