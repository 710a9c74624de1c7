use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

mod coins;
mod market;

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(market::router())
        .merge(coins::router());

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        // Outer layers see the request first; the id must be set before it
        // can be propagated.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
