use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::ApiError,
    models::{AppState, DoctorRow, ListResponse},
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_doctors))
}

/// Public directory the booking form is populated from.
pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<DoctorRow>>, ApiError> {
    let rows: Vec<DoctorRow> = sqlx::query_as::<_, DoctorRow>(
        r#"
        SELECT doctor_id, name, specialization, contact, email
        FROM doctor
        ORDER BY name ASC
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    Ok(Json(ListResponse::new(rows)))
}
