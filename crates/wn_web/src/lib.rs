use axum::{routing::post, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use handlers::{ChatRequest, ChatResponse};
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Binds `host:port`; `host` may be a name such as `localhost`.
pub async fn bind(host: &str, port: u16) -> wn_core::Result<TcpListener> {
    Ok(TcpListener::bind((host, port)).await?)
}

pub async fn serve(listener: TcpListener, state: AppState) -> wn_core::Result<()> {
    info!("🌍 World News Chat API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}
