// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{AppState, AppointmentStatus, Role},
    scheduling::{self, AppointmentWithDoctor, AppointmentWithPatient, NewAppointment},
};

fn ensure_patient(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role == Role::Patient {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

fn ensure_doctor(auth: &AuthContext) -> Result<(), ApiError> {
    if auth.role == Role::Doctor {
        Ok(())
    } else {
        Err(ApiError::forbidden())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/book", post(book))
        .route("/doctor/my", get(doctor_my))
        .route("/patient/my", get(patient_my))
        .route("/{id}/reject", post(reject))
}

/* ============================================================
   DTOs
   ============================================================ */

/// Fields are optional so an incomplete body maps to the "Missing fields"
/// response instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub doctor_id: Option<i64>,
    pub appointment_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub success: bool,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub success: bool,
}

/* ============================================================
   POST /book
   ============================================================ */

pub async fn book(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    ensure_patient(&auth)?;

    let (Some(doctor_id), Some(appointment_date), Some(start_time), Some(end_time)) = (
        req.doctor_id,
        req.appointment_date,
        req.start_time,
        req.end_time,
    ) else {
        return Err(ApiError::BadRequest("Missing fields".into()));
    };

    if start_time >= end_time {
        return Err(ApiError::BadRequest(
            "startTime must be before endTime".into(),
        ));
    }

    let id = scheduling::book(
        &state.db,
        NewAppointment {
            patient_id: auth.id,
            doctor_id,
            appointment_date,
            start_time,
            end_time,
            reason: req.reason,
            status: req.status,
        },
    )
    .await?;

    Ok(Json(BookResponse { success: true, id }))
}

/* ============================================================
   GET /doctor/my and /patient/my
   ============================================================ */

pub async fn doctor_my(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<AppointmentWithPatient>>, ApiError> {
    ensure_doctor(&auth)?;

    let rows = scheduling::list_for_doctor(&state.db, auth.id)
        .await
        .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;
    Ok(Json(rows))
}

pub async fn patient_my(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<AppointmentWithDoctor>>, ApiError> {
    ensure_patient(&auth)?;

    let rows = scheduling::list_for_patient(&state.db, auth.id)
        .await
        .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;
    Ok(Json(rows))
}

/* ============================================================
   POST /{id}/reject
   ============================================================ */

pub async fn reject(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<RejectResponse>, ApiError> {
    ensure_doctor(&auth)?;

    scheduling::reject(&state.db, id, auth.id).await?;
    Ok(Json(RejectResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{BookRequest, BookResponse};
    use crate::models::AppointmentStatus;

    #[test]
    fn book_body_parses_wire_date_and_time_formats() {
        let req: BookRequest = serde_json::from_value(json!({
            "doctorId": 5,
            "appointmentDate": "2025-11-01",
            "startTime": "09:00:00",
            "endTime": "10:00:00",
            "reason": "Checkup",
        }))
        .unwrap();
        assert_eq!(req.doctor_id, Some(5));
        assert_eq!(
            req.appointment_date,
            Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap())
        );
        assert_eq!(
            req.start_time,
            Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
        );
        assert_eq!(
            req.end_time,
            Some(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
        );
        assert_eq!(req.status, None);
    }

    #[test]
    fn book_body_accepts_explicit_status() {
        let req: BookRequest = serde_json::from_value(json!({
            "doctorId": 5,
            "appointmentDate": "2025-11-01",
            "startTime": "09:00:00",
            "endTime": "10:00:00",
            "status": "Pending",
        }))
        .unwrap();
        assert_eq!(req.status, Some(AppointmentStatus::Pending));
    }

    #[test]
    fn book_response_shape() {
        assert_eq!(
            serde_json::to_value(BookResponse {
                success: true,
                id: 12,
            })
            .unwrap(),
            json!({ "success": true, "id": 12 })
        );
    }
}
