// --- File: crates/dentify_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{DentifyError, HttpStatusCode};

// Include the client module
pub mod client;

/// Extension trait for DentifyError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for DentifyError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let error_message = self.to_string();

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for DentifyError to make it easier to use in Axum handlers.
impl IntoResponse for DentifyError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{conflict, not_found, validation_error};
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn errors_map_to_their_status_codes() {
        assert_eq!(
            validation_error("bad date").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            conflict("slot taken").into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            not_found("no such appointment").into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn error_body_carries_the_envelope() {
        let response = conflict("slot taken").into_response();
        let body = body_json(response).await;

        assert_eq!(body["error"]["code"], json!(409));
        assert_eq!(body["error"]["message"], json!("Conflict: slot taken"));
    }
}
