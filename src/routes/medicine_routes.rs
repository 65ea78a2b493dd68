// src/routes/medicine_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, ListResponse, MedicineRow, MessageResponse, Role},
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
        .route("/", get(list_medicines))
        .route("/{id}/dispense", post(dispense))
}

/* ============================================================
   GET /
   ============================================================ */

pub async fn list_medicines(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<MedicineRow>>, ApiError> {
    let rows: Vec<MedicineRow> = sqlx::query_as::<_, MedicineRow>(
        r#"
        SELECT medicine_id, name, category, price, stock, manufacturer, description
        FROM medicine
        ORDER BY name ASC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(ListResponse::new(rows)))
}

/* ============================================================
   POST /{id}/dispense
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct DispenseRequest {
    pub quantity: Option<i32>,
}

pub async fn dispense(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(medicine_id): Path<i64>,
    Json(req): Json<DispenseRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    ensure_staff(&auth)?;

    let quantity = req.quantity.unwrap_or(0);
    if quantity <= 0 {
        return Err(ApiError::BadRequest("quantity must be positive".into()));
    }

    let stock: Option<i32> =
        sqlx::query_scalar(r#"SELECT stock FROM medicine WHERE medicine_id = $1"#)
            .bind(medicine_id)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;
    if stock.is_none() {
        return Err(ApiError::NotFound("Medicine not found".into()));
    }

    // The stock guard lives in the UPDATE itself, so concurrent dispenses
    // cannot drive the count negative.
    let updated = sqlx::query(
        r#"
        UPDATE medicine
        SET stock = stock - $2
        WHERE medicine_id = $1
          AND stock >= $2
        "#,
    )
    .bind(medicine_id)
    .bind(quantity)
    .execute(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::Conflict("Insufficient stock".into()));
    }

    Ok(Json(MessageResponse::new("Stock updated")))
}
