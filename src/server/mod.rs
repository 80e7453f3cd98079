//! HTTP server for deck-outline
//!
//! Every route funnels into `OutlineService::handle`, which owns method
//! dispatch, so the endpoint behaves the same whichever path it is mounted on.

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::Settings;
use crate::outline::{OutlineService, Reply};

/// Paths the outline handler answers on
pub const ROUTES: [&str; 3] = [
    "/",
    "/api/generate-outline",
    "/.netlify/functions/generate-outline",
];

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// Build the router for a service.
pub fn router(service: OutlineService) -> Router {
    ROUTES
        .iter()
        .fold(Router::new(), |router, path| router.route(path, any(handle)))
        .with_state(service)
}

async fn handle(State(service): State<OutlineService>, method: Method, body: Bytes) -> Reply {
    let span = info_span!("request", id = %Uuid::new_v4(), %method);

    async move {
        let reply = service.handle(&method, &body).await;
        info!(status = reply.status.as_u16(), "Handled request");
        reply
    }
    .instrument(span)
    .await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, service: OutlineService, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Outline server listening on http://{}", addr);

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")
}

/// Bind to the configured address and serve until Ctrl-C.
pub async fn run(settings: Settings) -> Result<()> {
    let bind = settings.server.bind.clone();
    let service = OutlineService::from_settings(settings)?;
    info!(
        model = %service.health().model,
        has_key = service.health().has_key,
        "Outline service ready"
    );

    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    serve(listener, service, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
