//! HTTP dashboard
//!
//! Serves the sidebar-navigated HTML pages of one [`Session`] plus a small JSON API over the
//! same pages. The session is loaded before the server binds, so every request is answered
//! from the already acquired base table.

pub mod handlers;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{DashboardError, ErrorCode, Result};
use crate::render::HtmlRenderer;
use crate::session::Session;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub html: Arc<HtmlRenderer>,
}

/// Build the dashboard router over `session`
pub fn router(session: Arc<Session>) -> Result<Router> {
    let state = AppState {
        session,
        html: Arc::new(HtmlRenderer::new()?),
    };

    Ok(Router::new()
        .route("/", get(handlers::home))
        .route("/views/{slug}", get(handlers::view_page))
        .route("/api/views", get(handlers::list_views))
        .route("/api/views/{slug}", get(handlers::view_json))
        .route("/api/views/{slug}/charts/{chart}", get(handlers::chart_svg))
        .route("/api/views/{slug}/export", get(handlers::export_view))
        .route("/api/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

pub struct DashboardServer {
    host: String,
    port: u16,
    session: Arc<Session>,
}

impl DashboardServer {
    pub fn new(host: impl Into<String>, port: u16, session: Arc<Session>) -> Self {
        Self {
            host: host.into(),
            port,
            session,
        }
    }

    /// Bind the listener without serving yet
    pub async fn bind(&self) -> Result<TcpListener> {
        let address = format!("{}:{}", self.host, self.port);
        TcpListener::bind(&address).await.map_err(|e| {
            DashboardError::server_with_code(
                ErrorCode::SERVER_BIND_FAILED,
                format!("could not listen on {}", address),
            )
            .with_source(e)
        })
    }

    /// Serve until the process is stopped
    pub async fn start(self) -> Result<()> {
        let listener = self.bind().await?;
        let app = router(Arc::clone(&self.session))?;
        let addr: Option<SocketAddr> = listener.local_addr().ok();
        match addr {
            Some(addr) => info!("Dashboard listening on http://{}", addr),
            None => info!("Dashboard listening on {}:{}", self.host, self.port),
        }

        axum::serve(listener, app).await.map_err(|e| {
            DashboardError::server_with_code(ErrorCode::SERVER_STOPPED, "server stopped unexpectedly")
                .with_source(e)
        })
    }
}
