use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coinpulse_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MarketData(e) => match e {
                MarketDataError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
                MarketDataError::SymbolUnsupported(_) => StatusCode::NOT_FOUND,
                MarketDataError::DegenerateSnapshot => StatusCode::SERVICE_UNAVAILABLE,
                MarketDataError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
