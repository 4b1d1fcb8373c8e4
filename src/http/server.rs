//! HTTP server setup and request pipeline.
//!
//! # Responsibilities
//! - Create the axum app with a catch-all handler
//! - Wire up middleware (tracing, timeout, request id)
//! - Drive segmenter → route match → dispatch → envelope rendering
//! - Graceful shutdown
//!
//! # Design Decisions
//! - One catch-all handler: the engine's own route table decides
//!   everything, axum only carries the transport
//! - A route miss answers 404 unless the legacy redirect-to-base-URL
//!   behavior is enabled in config
//! - Every handled request is recorded with method, status, and the
//!   resolved module

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Redirect, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EngineConfig;
use crate::error::Error;
use crate::http::method::Method;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::{render, render_error};
use crate::observability::metrics;
use crate::routing::Router as EngineRouter;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EngineRouter>,
    pub redirect_on_miss: bool,
    pub base_url: String,
}

/// HTTP front end for the engine.
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    /// Create the server around a frozen routing engine.
    pub fn new(config: &EngineConfig, router: Arc<EngineRouter>) -> Self {
        let state = AppState {
            router,
            redirect_on_miss: config.routing.redirect_on_miss,
            base_url: config.routing.base_url.clone(),
        };
        Self {
            app: Self::build_app(config, state),
        }
    }

    /// Build the axum app with all middleware layers.
    fn build_app(config: &EngineConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(engine_handler))
            .route("/", any(engine_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
            // One shared permit pool across every connection; requests
            // past the cap wait for a permit instead of being dropped.
            .layer(GlobalConcurrencyLimitLayer::new(
                config.listener.max_connections,
            ))
    }

    /// Run until ctrl-c.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app.into_make_service())
            .with_graceful_shutdown(ctrl_c_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run until the given channel fires; used by tests and embedders
    /// that own the process lifecycle.
    pub async fn run_with_shutdown(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main engine handler: method taxonomy, route resolution, dispatch,
/// envelope rendering.
async fn engine_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let raw_method = request.method().clone();
    let path = request.uri().path().to_string();

    let method = match Method::try_from(&raw_method) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(method = %raw_method, "request with unsupported method");
            metrics::record_request(raw_method.as_str(), e.status().as_u16(), "none", start);
            return render_error(&e);
        }
    };

    tracing::debug!(method = %method, path = %path, "handling request");

    match state.router.dispatch(method, &path) {
        Ok(dispatched) => {
            let module = dispatched.context.module.clone();
            let response = render(dispatched.context.format, dispatched.response);
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                &module,
                start,
            );
            response
        }
        Err(Error::RouteNotFound { .. })
            if state.redirect_on_miss && !state.base_url.is_empty() =>
        {
            tracing::debug!(path = %path, "route miss, redirecting to base URL");
            metrics::record_request(method.as_str(), 307, "none", start);
            Redirect::temporary(&state.base_url).into_response()
        }
        Err(e) => {
            let status = e.status();
            tracing::warn!(method = %method, path = %path, error = %e, "dispatch failed");
            metrics::record_request(method.as_str(), status.as_u16(), "none", start);
            render_error(&e)
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn ctrl_c_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
