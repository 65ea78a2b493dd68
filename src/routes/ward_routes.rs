// src/routes/ward_routes.rs

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, MessageResponse, Role, WardRow},
};

fn ensure_staff(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role == Role::Doctor || auth.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wards))
        .route("/assign", post(assign))
}

pub async fn list_wards(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> Result<Json<Vec<WardRow>>, ApiError> {
    let rows: Vec<WardRow> = sqlx::query_as::<_, WardRow>(
        r#"
        SELECT ward_id, ward_name, capacity, assigned_patient_id
        FROM ward
        ORDER BY ward_id ASC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignWardRequest {
    pub ward_id: Option<i64>,
    pub patient_id: Option<i64>,
}

/// Last-write-wins: assigning a new patient replaces the previous one, and
/// capacity is not enforced.
pub async fn assign(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<AssignWardRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_staff(&auth)?;

    let (Some(ward_id), Some(patient_id)) = (req.ward_id, req.patient_id) else {
        return Err(ApiError::BadRequest("Missing fields".into()));
    };

    sqlx::query(
        r#"
        UPDATE ward
        SET assigned_patient_id = $2
        WHERE ward_id = $1
        "#,
    )
    .bind(ward_id)
    .bind(patient_id)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(MessageResponse::new("Patient assigned to ward")))
}
