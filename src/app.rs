/*
 * Responsibility
 * - Config読み込み → 依存生成 (PgPool / migrations / AuthorizationGate) → Router 組み立て
 * - Middleware の適用 (HTTP / security headers / CORS)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::middleware::http::HttpSettings;
use crate::repos::role_repo;
use crate::services::auth::build_gate;
use crate::{api, config::Config, middleware, state::AppState};

fn init_tracing() {
    // RUST_LOG があれば優先
    // ex: RUST_LOG=info,storefront=debug,tower_http=debug
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
        tracing::error!(?info, "panic");

        // development: fail fast
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting storefront in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to DATABASE_URL")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("running migrations")?;

    // sign-up が常に role 行を持てるように
    let signup_role = role_repo::ensure(&db, &config.default_signup_role)
        .await
        .context("ensuring DEFAULT_SIGNUP_ROLE exists")?;
    tracing::info!(role = %signup_role.name, "sign-up role ready");

    let gate = build_gate(&config).context("building authorization gate")?;

    let state = AppState::new(
        db,
        gate,
        config.access_policy.clone(),
        signup_role.name,
    );

    let app = build_router(state);
    let app = middleware::cors::apply(app, config.app_env, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Full `/api/v1` router with HTTP middleware and security headers.
/// CORS is left to the caller since it depends on the deployment.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    middleware::http::apply(router, HttpSettings::default())
}
