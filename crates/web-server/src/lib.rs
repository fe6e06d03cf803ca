// In crates/web-server/src/lib.rs

use analytics::AnalyticsEngine;
use app_config::ServerSettings;
use axum::{
    routing::{get, post},
    Router,
};
use database::TradeStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use uuid::Uuid;

pub mod error;
pub mod handlers;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

use handlers::{reports, trades};

/// The shared application state that is available to all API handlers.
///
/// Cloning is cheap: the store sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TradeStore>,
    /// The journal owner every request is scoped to.
    pub user_id: Uuid,
    pub engine: AnalyticsEngine,
}

impl AppState {
    pub fn new(store: Arc<dyn TradeStore>, user_id: Uuid) -> Self {
        Self {
            store,
            user_id,
            engine: AnalyticsEngine::new(),
        }
    }
}

/// Creates the main application router with all routes and middleware.
///
/// # Arguments
///
/// * `app_state`: The shared `AppState` containing the trade store.
///
/// # Returns
///
/// The configured `axum::Router`.
pub fn create_router(app_state: AppState) -> Router {
    // The journal UI may be served from anywhere.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let analytics_router = Router::new()
        .route("/stats", get(reports::stats_handler))
        .route("/btmm", get(reports::btmm_handler))
        .route("/pnl-chart", get(reports::pnl_chart_handler))
        .route("/recent-trades", get(reports::recent_trades_handler));

    let api_router = Router::new()
        .route("/health", get(handlers::health_check_handler))
        .route(
            "/trades",
            get(trades::list_trades_handler).post(trades::create_trade_handler),
        )
        .route(
            "/trades/{id}",
            get(trades::get_trade_handler)
                .put(trades::update_trade_handler)
                .delete(trades::delete_trade_handler),
        )
        .route("/trades/{id}/close", post(trades::close_trade_handler))
        .nest("/analytics", analytics_router);

    Router::new()
        .route("/health", get(handlers::health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// The main entry point for running the web server.
///
/// Serves until the process receives Ctrl-C.
pub async fn run(settings: ServerSettings, app_state: AppState) -> Result<()> {
    let app = create_router(app_state);

    let address = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;
    tracing::info!("Web server listening on {}", address);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve)?;

    tracing::info!("Web server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
