use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized("Invalid credentials".into())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden("Forbidden".into())
    }

    fn body(message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            message: message.to_string(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::body(&msg)).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ApiError::body(&msg)).into_response()
            }
            ApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, ApiError::body(&msg)).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ApiError::body(&msg)).into_response()
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, ApiError::body(&msg)).into_response()
            }
            ApiError::Internal(msg) => {
                // Low-level detail stays in the server log; clients get a generic body.
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::body("Internal server error"),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use pretty_assertions::assert_eq;

    use super::ApiError;

    #[test]
    fn maps_variants_to_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn internal_error_hides_detail_from_clients() {
        let resp = ApiError::Internal("db error: connection refused".into()).into_response();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["message"], "Internal server error");
    }
}
