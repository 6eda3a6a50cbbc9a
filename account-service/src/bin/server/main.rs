use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::account::service::AuthService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::notifier::LoggingNotifier;
use account_service::outbound::repositories::PostgresAccountRepository;
use auth::OtpManager;
use auth::TokenIssuer;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        otp_code_length = config.otp.code_length,
        otp_ttl_seconds = config.otp.ttl_seconds,
        access_token_expire_minutes = config.token.access_token_expire_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let token_issuer = Arc::new(TokenIssuer::new(config.token.secret.as_bytes()));
    let otp_manager = OtpManager::new(
        config.otp.code_length,
        Duration::seconds(config.otp.ttl_seconds),
    );

    let repository = Arc::new(PostgresAccountRepository::new(pg_pool));
    let notifier = Arc::new(LoggingNotifier::new(config.site.url.clone()));

    let auth_service = Arc::new(AuthService::new(
        repository,
        notifier,
        Arc::clone(&token_issuer),
        otp_manager,
        Duration::minutes(config.token.access_token_expire_minutes),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let application = create_router(auth_service, token_issuer);
    axum::serve(http_listener, application).await?;

    Ok(())
}
