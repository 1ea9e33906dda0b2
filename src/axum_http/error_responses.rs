use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::usecases::{
    admin_stats::AdminStatsError, crops::CropError, subscriptions::SubscriptionError,
};

/// Every error leaves the API as `{"error": "..."}`; the farm UI keys off
/// that field for its banners.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for SubscriptionError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Don't leak internal error detail to client
            SubscriptionError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        error_response(self.status_code(), message)
    }
}

impl IntoResponse for CropError {
    fn into_response(self) -> Response {
        let message = match &self {
            CropError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        error_response(self.status_code(), message)
    }
}

impl IntoResponse for AdminStatsError {
    fn into_response(self) -> Response {
        let message = match &self {
            AdminStatsError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        error_response(self.status_code(), message)
    }
}
