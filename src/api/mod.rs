pub mod analyze;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clients::{OptionsDataSource, StrategyAnalyzer};
use crate::ui::PageController;

#[derive(Clone)]
pub struct AppState {
    pub page: Arc<PageController>,
}

impl AppState {
    pub fn new(options: Arc<dyn OptionsDataSource>, analyzer: Arc<dyn StrategyAnalyzer>) -> Self {
        Self {
            page: Arc::new(PageController::new(options, analyzer)),
        }
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(page::index))
        .route("/analyze", post(page::analyze))
        .route("/api/analyze", post(analyze::handler))
        .route("/health", get(health_check))
}

pub fn create_app(state: Arc<AppState>) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
