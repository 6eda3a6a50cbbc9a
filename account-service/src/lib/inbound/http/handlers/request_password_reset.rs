use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;
use crate::account::ports::Notifier;
use crate::inbound::http::router::AppState;

pub async fn request_password_reset<R: AccountRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Json(body): Json<PasswordResetRequestBody>,
) -> Result<ApiSuccess<ResetRequestedResponseData>, ApiError> {
    state
        .auth_service
        .request_password_reset(&body.email)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ResetRequestedResponseData {
            message: "Password reset link sent to email".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequestBody {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetRequestedResponseData {
    pub message: String,
}
