//! Web server module

mod error;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, QueriesConfig};
use crate::db::queries::QueryId;
use crate::db::Database;
use crate::loader::Loader;

pub struct AppState {
    pub db: Database,
    pub loader: Loader,
    pub queries: QueriesConfig,
}

impl AppState {
    pub fn new(config: &Config, db: Database) -> Self {
        Self {
            db,
            loader: Loader::new(&config.loader),
            queries: config.queries.clone(),
        }
    }
}

pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/consultas", get(routes::catalog))
        .route(QueryId::TopCustomer.route(), get(routes::consulta1))
        .route(QueryId::ProductExtremes.route(), get(routes::consulta2))
        .route(QueryId::TopSeller.route(), get(routes::consulta3))
        .route(QueryId::SellerCountryExtremes.route(), get(routes::consulta4))
        .route(QueryId::TopBuyerCountries.route(), get(routes::consulta5))
        .route(QueryId::CategoryExtremes.route(), get(routes::consulta6))
        .route(QueryId::TopCategoryPerCountry.route(), get(routes::consulta7))
        .route(QueryId::MonthlyCountrySales.route(), get(routes::consulta8))
        .route(QueryId::MonthExtremes.route(), get(routes::consulta9))
        .route(QueryId::CategoryProductSales.route(), get(routes::consulta10))
        // Schema management and loading
        .route("/crearmodelo", get(routes::create_model))
        .route("/eliminarmodelo", get(routes::delete_model))
        .route("/borrarinfodb", get(routes::delete_data))
        .route("/cargarmodelo", get(routes::load_model))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &Config, db: Database) -> Result<()> {
    let state = Arc::new(AppState::new(config, db.clone()));
    let app = router(state, Duration::from_secs(config.server.request_timeout_secs));

    let addr = config.bind_addr();
    info!("Web server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
