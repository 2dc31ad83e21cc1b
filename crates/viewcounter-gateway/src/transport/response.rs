//! Error -> HTTP response mapping.
//!
//! Every failure becomes `{ "error": "<message>" }` with a status derived
//! from the stable client code:
//! - 400 validation / invalid value
//! - 404 unknown route, 405 wrong method (single-route mode)
//! - 503 backend unavailable, 504 request timeout, 500 anything else

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use viewcounter_core::envelope::ErrorBody;
use viewcounter_core::error::{ClientCode, ViewCounterError};

/// Handler result type.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Wrapper so core errors can be returned straight from axum handlers.
#[derive(Debug)]
pub struct ApiError(pub ViewCounterError);

impl From<ViewCounterError> for ApiError {
    fn from(e: ViewCounterError) -> Self {
        Self(e)
    }
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest | ClientCode::InvalidValue => StatusCode::BAD_REQUEST,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ClientCode::BackendUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ClientCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ClientCode::Config | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        if code.is_client_error() {
            tracing::debug!(code = code.as_str(), error = %self.0, "request rejected");
        } else {
            tracing::warn!(code = code.as_str(), error = %self.0, "request failed");
        }

        let body = Json(ErrorBody { error: self.0.to_string() });
        (status_for(code), body).into_response()
    }
}
