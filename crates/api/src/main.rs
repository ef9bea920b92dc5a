use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockdash_core::dashboard::DashboardView;
use stockdash_core::storage::cache::TableCache;
use stockdash_core::storage::tables::MySqlTableSource;

mod page;

#[derive(Debug, Parser)]
#[command(name = "stockdash_api")]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: std::net::IpAddr,

    /// How long a loaded table is served before it is queried again.
    #[arg(long)]
    cache_ttl_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let settings = stockdash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let ttl = args
        .cache_ttl_secs
        .map(Duration::from_secs)
        .unwrap_or(settings.cache_ttl);

    let cache = match stockdash_core::storage::connect(&settings).await {
        Ok(pool) => Some(TableCache::new(
            Arc::new(MySqlTableSource::new(pool)),
            ttl,
        )),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %format!("{e:#}"), "db connect failed; starting in degraded mode");
            None
        }
    };

    let app = router(AppState { cache });

    let addr = std::net::SocketAddr::new(args.bind, args.port);
    tracing::info!(%addr, cache_ttl_secs = ttl.as_secs(), "dashboard listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_json))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    cache: Option<TableCache>,
}

#[derive(Debug, Deserialize)]
struct DashboardQuery {
    month: Option<String>,
}

async fn dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, StatusCode> {
    let view = build_view(&state, query.month.as_deref()).await?;
    let html = page::render(&view).map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "page render failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Html(html))
}

async fn dashboard_json(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, StatusCode> {
    Ok(Json(build_view(&state, query.month.as_deref()).await?))
}

async fn build_view(state: &AppState, month: Option<&str>) -> Result<DashboardView, StatusCode> {
    let Some(cache) = &state.cache else {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let tables = cache.load_all().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %format!("{e:#}"), "loading dashboard tables failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let view = DashboardView::build(&tables, month);
    let failed = view.failed_sections();
    if failed > 0 {
        tracing::warn!(failed, month, "dashboard rendered with failed sections");
    }
    Ok(view)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &stockdash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
