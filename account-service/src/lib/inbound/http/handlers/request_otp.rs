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

pub async fn request_otp<R: AccountRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Json(body): Json<OtpRequestBody>,
) -> Result<ApiSuccess<OtpRequestedResponseData>, ApiError> {
    state
        .auth_service
        .request_otp(&body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        OtpRequestedResponseData {
            message: "OTP sent to your email".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OtpRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpRequestedResponseData {
    pub message: String,
}
