use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use std::{panic, process, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{jwt::JwtIssuer, token_issuer::AccessTokenIssuer};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,storefront_auth=debug,tower_http=debug cargo run -p storefront-auth
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!(error = %e, "server error");
        AppError::Internal
    })?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState, AppError> {
    // users/roles schema is migrated by the storefront service
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to connect to DATABASE_URL");
            AppError::Internal
        })?;

    let jwt = JwtIssuer::new(
        &config.signing_key,
        config.issuer.clone(),
        config.audience.clone(),
        config.access_token_ttl_seconds,
    )?;

    Ok(AppState::new(db, Arc::new(AccessTokenIssuer::new(jwt))))
}

pub fn build_router(state: AppState) -> Router {
    async fn health() -> &'static str {
        "ok"
    }

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
