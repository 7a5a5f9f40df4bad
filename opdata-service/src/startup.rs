//! Application startup and lifecycle management.

use crate::config::OpDataConfig;
use crate::handlers;
use crate::services::{OpDataDb, OpDataService};
use axum::{
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Deadline for the connectivity check made before serving.
const STARTUP_PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub op_data: OpDataService,
}

/// Register the record routes, probes and the not-found fallback.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/opdata",
            get(handlers::list_op_data)
                .post(handlers::create_op_data)
                .fallback(handlers::unmatched_request),
        )
        .route(
            "/opdata/:id",
            get(handlers::get_op_data)
                .put(handlers::update_op_data)
                .delete(handlers::delete_op_data)
                .fallback(handlers::unmatched_request),
        )
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .fallback(handlers::unmatched_request)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    db: OpDataDb,
}

impl Application {
    /// Connect to MongoDB (fatal if the ping fails), bind the listener and
    /// build the router. Port 0 binds a random port.
    pub async fn build(config: OpDataConfig) -> Result<Self, AppError> {
        let db = OpDataDb::connect(
            &config.mongodb.uri,
            &config.mongodb.database,
            &config.mongodb.collection,
            STARTUP_PING_TIMEOUT,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            e
        })?;

        let state = AppState {
            op_data: OpDataService::new(Arc::new(db.clone()), config.store_timeout),
        };

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            store_timeout_secs = config.store_timeout.as_secs(),
            "OpData service listening"
        );

        Ok(Self {
            port,
            listener,
            router: build_router(state),
            db,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &OpDataDb {
        &self.db
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
