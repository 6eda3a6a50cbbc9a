use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::TokenResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountRepository;
use crate::account::ports::AuthServicePort;
use crate::account::ports::Notifier;
use crate::inbound::http::router::AppState;

pub async fn verify_otp<R: AccountRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Json(body): Json<OtpVerifyBody>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let access_token = state
        .auth_service
        .verify_otp(&body.email, &body.otp)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenResponseData::bearer(access_token),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OtpVerifyBody {
    email: String,
    otp: String,
}
