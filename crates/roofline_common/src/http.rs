// --- File: crates/roofline_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, RooflineError};

// Include the client module
pub mod client;

/// Extension trait for RooflineError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for RooflineError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = self.to_string();

        // Create a JSON response with the error message
        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }));

        // Combine the status code and body into a response
        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for RooflineError to make it easier to use in Axum handlers.
impl IntoResponse for RooflineError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// A utility function to convert a Result<T, E> to a Result<Json<T>, Response> using a custom error mapper.
/// This is useful for Axum handlers that need to convert domain-specific errors to HTTP responses.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> RooflineError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::validation_error;

    #[test]
    fn errors_map_to_their_status_codes() {
        let response = validation_error("missing reason").into_http_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = RooflineError::NotFoundError("lead 9".to_string()).into_http_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn map_json_error_translates_domain_errors() {
        let ok: Result<u32, std::io::Error> = Ok(7);
        assert!(map_json_error(ok, |e| RooflineError::InternalError(e.to_string())).is_ok());

        let err: Result<u32, std::io::Error> = Err(std::io::Error::other("boom"));
        let response = map_json_error(err, |e| RooflineError::InternalError(e.to_string()))
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
