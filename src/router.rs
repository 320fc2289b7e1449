use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers::donations::{create_donation, health, list_donations};
use crate::service::DonationService;

#[derive(Clone)]
pub struct AppState {
    pub donations: DonationService,
}

impl AppState {
    pub fn new(donations: DonationService) -> Self {
        Self { donations }
    }
}

pub fn donation_router(state: AppState, cfg: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(cfg.cors_origins()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/donations", get(list_donations).post(create_donation))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
