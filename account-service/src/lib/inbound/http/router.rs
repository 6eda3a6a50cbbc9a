use std::sync::Arc;
use std::time::Duration;

use auth::TokenIssuer;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::register::register;
use super::handlers::request_otp::request_otp;
use super::handlers::request_password_reset::request_password_reset;
use super::handlers::reset_password::reset_password;
use super::handlers::verify_email::verify_email;
use super::handlers::verify_otp::verify_otp;
use super::middleware::authenticate as auth_middleware;
use crate::account::ports::AccountRepository;
use crate::account::ports::Notifier;
use crate::account::service::AuthService;

pub struct AppState<R, N>
where
    R: AccountRepository,
    N: Notifier,
{
    pub auth_service: Arc<AuthService<R, N>>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl<R, N> Clone for AppState<R, N>
where
    R: AccountRepository,
    N: Notifier,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            token_issuer: Arc::clone(&self.token_issuer),
        }
    }
}

pub fn create_router<R, N>(
    auth_service: Arc<AuthService<R, N>>,
    token_issuer: Arc<TokenIssuer>,
) -> Router
where
    R: AccountRepository,
    N: Notifier,
{
    let state = AppState {
        auth_service,
        token_issuer,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<R, N>))
        .route("/api/auth/login", post(login::<R, N>))
        .route("/api/auth/verify-email", get(verify_email::<R, N>))
        .route("/api/auth/otp/request", post(request_otp::<R, N>))
        .route("/api/auth/otp/verify", post(verify_otp::<R, N>))
        .route(
            "/api/auth/password-reset/request",
            post(request_password_reset::<R, N>),
        )
        .route("/api/auth/password-reset", post(reset_password::<R, N>));

    let protected_routes = Router::new()
        .route("/api/users/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<R, N>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
