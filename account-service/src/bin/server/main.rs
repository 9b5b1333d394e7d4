use std::sync::Arc;

use account_service::config::Config;
use account_service::domain::user::service::CredentialService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::email::LogEmailSender;
use account_service::outbound::repositories::PostgresUserRepository;
use auth::TemporaryTokenGenerator;
use auth::TokenIssuer;
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
        public_url = %config.server.public_url,
        access_token_ttl_minutes = config.jwt.access_token_ttl_minutes,
        refresh_token_ttl_days = config.jwt.refresh_token_ttl_days,
        temporary_token_ttl_minutes = config.temporary_token.ttl_minutes,
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

    let token_issuer = Arc::new(TokenIssuer::new(
        config.jwt.access_token_secret.as_bytes(),
        config.access_token_ttl(),
        config.jwt.refresh_token_secret.as_bytes(),
        config.refresh_token_ttl(),
    )?);
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let email_sender = Arc::new(LogEmailSender::new(&config));

    let credential_service = Arc::new(CredentialService::new(
        user_repository,
        email_sender,
        Arc::clone(&token_issuer),
        TemporaryTokenGenerator::new(config.temporary_token_ttl()),
        config.server.public_url.clone(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(credential_service, token_issuer);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");
    Ok(())
}
