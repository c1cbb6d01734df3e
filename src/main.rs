//! Procurement opportunity matching and decision-support engine — HTTP
//! entry point. Wires the SQLite repository, the SAM.gov ingestion
//! fetcher, and the JWT/RBAC auth layer behind the axum router defined
//! in `api/`.

mod api;
mod auth;
mod error;
mod ingestion;
mod middleware;
mod models;
mod proposal;
mod repository;
mod rules;
mod scoring;
mod text;

use anyhow::{Context, Result};
use auth::{api as auth_api, auth_middleware, AuthState, JwtHandler, UserStore};
use axum::{
    middleware as axum_mw,
    routing::{delete, get, post},
    Router,
};
use ingestion::SamGovFetcher;
use middleware::{request_logging, RateLimitConfig, RateLimitLayer};
use models::Config;
use repository::sqlite::SqliteRepository;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "procureiq_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(port = config.port, database_path = %config.database_path, "starting procureiq engine");

    let repo = Arc::new(
        SqliteRepository::new(&config.database_path).context("failed to open repository")?,
    );
    let fetcher = Arc::new(SamGovFetcher::new(
        config.feed_api_key.clone(),
        config.feed_base_url.clone(),
        30,
    ));

    let user_store =
        Arc::new(UserStore::new(&config.database_path).context("failed to open user store")?);
    let jwt_handler = Arc::new(JwtHandler::new(config.jwt_secret.clone()));
    let auth_state = AuthState {
        user_store,
        jwt_handler: jwt_handler.clone(),
    };

    let app_state = api::AppState {
        repo,
        fetcher,
        config: Arc::new(config.clone()),
    };

    let rate_limiter = RateLimitLayer::new(RateLimitConfig {
        max_requests: config.rate_limit_per_minute,
        ..Default::default()
    });

    let cors = build_cors(&config.cors_origins);

    let public_auth_routes = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state.clone());

    let protected_auth_routes = Router::new()
        .route("/api/auth/me", get(auth_api::get_current_user))
        .route(
            "/api/admin/users",
            get(auth_api::list_users).post(auth_api::create_user),
        )
        .route("/api/admin/users/:id", delete(auth_api::delete_user))
        .route_layer(axum_mw::from_fn_with_state(
            jwt_handler.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    let core_routes = Router::new()
        .route("/organizations", post(api::organizations::upsert_organization))
        .route("/organizations/:id", get(api::organizations::get_organization))
        .route(
            "/opportunities",
            get(api::opportunities::list_opportunities).post(api::opportunities::upsert_opportunity),
        )
        .route("/opportunities/:id", get(api::opportunities::get_opportunity))
        .route(
            "/opportunities/naics/:code",
            get(api::opportunities::list_opportunities_by_naics),
        )
        .route("/scoring/calculate", post(api::scoring::calculate))
        .route("/scoring/batch", post(api::scoring::batch))
        .route("/risk/assess", post(api::risk::assess))
        .route("/win-probability/calculate", post(api::win_probability::calculate))
        .route("/pricing/recommendation", post(api::pricing::recommendation))
        .route("/pricing/should-cost", post(api::pricing::should_cost))
        .route("/proposals/generate", post(api::proposal::generate))
        .route("/ingestion/trigger", post(api::ingestion::trigger))
        .route("/ingestion/status/:id", get(api::ingestion::status))
        .route("/ingestion/history", get(api::ingestion::history))
        .with_state(app_state);

    let supply_chain_routes = Router::new()
        .route("/supply-chain/verify", post(api::supply_chain::verify_supplier))
        .route(
            "/supply-chain/section-889/check",
            post(api::supply_chain::check_section_889),
        )
        .route("/supply-chain/taa/check", post(api::supply_chain::check_taa))
        .route(
            "/supply-chain/taa/batch-check",
            post(api::supply_chain::batch_check_taa),
        );

    let app = Router::new()
        .route("/health", get(health))
        .merge(public_auth_routes)
        .merge(protected_auth_routes)
        .merge(core_routes)
        .merge(supply_chain_routes)
        .layer(axum_mw::from_fn_with_state(
            rate_limiter,
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(request_logging))
        .layer(cors);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<axum::http::HeaderValue> =
        origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
