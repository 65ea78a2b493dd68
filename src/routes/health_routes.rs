use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::models::AppState;

#[derive(Debug, Serialize)]
pub struct DbHealth {
    pub db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health/db", get(db_health))
}

/// Liveness probe for the database connection.
pub async fn db_health(State(state): State<AppState>) -> Response {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => Json(DbHealth {
            db: "up",
            error: None,
        })
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DbHealth {
                db: "down",
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
