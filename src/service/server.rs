//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the shell's handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on whichever listener the runner bound
//! - Stop accepting and drain when the shutdown signal fires

use axum::{
    extract::State,
    http::{HeaderName, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::service::bind::BoundListener;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// HTTP server for the supervised service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig) -> Self {
        let state = AppState {
            config: Arc::new(config.clone()),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let mut router = Router::new()
            .route("/", get(index))
            .route("/health", get(health))
            .route("/config", get(current_config));

        if let Some(dir) = &config.server.static_dir {
            router = router.nest_service("/static", ServeDir::new(dir));
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                ))),
        )
    }

    /// Serve on `listener` until `shutdown` fires, then drain and return.
    pub async fn run(
        self,
        listener: BoundListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr();
        tracing::info!(address = %address, "HTTP server starting");

        let signal = async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received");
        };

        match listener {
            BoundListener::Tcp(listener) => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(signal)
                    .await?;
            }
            #[cfg(unix)]
            BoundListener::Unix { listener, socket } => {
                axum::serve(listener, self.router)
                    .with_graceful_shutdown(signal)
                    .await?;
                drop(socket);
            }
        }

        tracing::info!(address = %address, "HTTP server stopped");
        Ok(())
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let items: String = state
        .config
        .content
        .enabled()
        .into_iter()
        .map(|(name, source)| {
            format!(
                "<li>{} ({} director{})</li>",
                name,
                source.directories.len(),
                if source.directories.len() == 1 { "y" } else { "ies" }
            )
        })
        .collect();

    Html(format!(
        "<!doctype html><html><head><title>search-desk</title></head>\
         <body><h1>search-desk</h1><p>Indexed content:</p><ul>{}</ul></body></html>",
        items
    ))
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn current_config(State(state): State<AppState>) -> impl IntoResponse {
    match serde_json::to_value(state.config.as_ref()) {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize configuration");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
