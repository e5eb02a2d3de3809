//! CareGate server — application entry point.

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use caregate_auth::AuthService;
use caregate_db::DbManager;
use caregate_db::repository::SurrealAccountRepository;
use caregate_server::config::ServerConfig;
use caregate_server::routes;
use caregate_server::state::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("caregate=info".parse()?),
        )
        .json()
        .init();

    let config = ServerConfig::from_env()?;

    let db = DbManager::connect(&config.db)
        .await
        .context("connecting to SurrealDB")?;
    caregate_db::run_migrations(db.client())
        .await
        .context("running migrations")?;

    let accounts = SurrealAccountRepository::new(db.client().clone());
    let state = AppState::new(AuthService::new(accounts, config.auth.clone()));

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .context("parsing CORS origin")?,
        )
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = routes::build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "CareGate API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
