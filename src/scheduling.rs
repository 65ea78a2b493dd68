// src/scheduling.rs
//
// Appointment scheduling: overlap detection, booking, reject, listings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use crate::error::ApiError;
use crate::models::AppointmentStatus;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Doctor not found")]
    DoctorNotFound,
    #[error("Doctor busy in this slot")]
    DoctorBusy,
    #[error("Patient already booked in this window")]
    PatientBusy,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::DoctorNotFound => ApiError::NotFound(err.to_string()),
            BookingError::DoctorBusy | BookingError::PatientBusy => {
                ApiError::Conflict(err.to_string())
            }
            BookingError::Db(e) => ApiError::Internal(format!("db error: {e}")),
        }
    }
}

#[derive(Debug, Error)]
pub enum RejectError {
    #[error("Appointment not found")]
    NotFound,
    #[error("Forbidden")]
    NotOwner,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<RejectError> for ApiError {
    fn from(err: RejectError) -> Self {
        match err {
            RejectError::NotFound => ApiError::NotFound(err.to_string()),
            RejectError::NotOwner => ApiError::Forbidden(err.to_string()),
            RejectError::Db(e) => ApiError::Internal(format!("db error: {e}")),
        }
    }
}

/* ============================================================
   Slot math
   ============================================================ */

/// One stored interval on a day's calendar.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct BookedSlot {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
}

/// Half-open interval intersection: [a, b) and [start, end) collide iff
/// `a < end && start < b`. Touching boundaries (10:00 end vs 10:00 start)
/// do not collide.
pub fn overlaps(
    existing_start: NaiveTime,
    existing_end: NaiveTime,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    existing_start < end && start < existing_end
}

/// Cancelled and rejected appointments release their slot; everything else
/// keeps blocking it.
pub fn blocks_slot(status: AppointmentStatus) -> bool {
    !matches!(
        status,
        AppointmentStatus::Cancelled | AppointmentStatus::Rejected
    )
}

pub fn slot_taken(existing: &[BookedSlot], start: NaiveTime, end: NaiveTime) -> bool {
    existing
        .iter()
        .any(|s| blocks_slot(s.status) && overlaps(s.start_time, s.end_time, start, end))
}

/* ============================================================
   Conflict checkers
   ============================================================ */

async fn day_slots_for_doctor(
    conn: &mut PgConnection,
    doctor_id: i64,
    date: NaiveDate,
) -> sqlx::Result<Vec<BookedSlot>> {
    sqlx::query_as::<_, BookedSlot>(
        r#"
        SELECT start_time, end_time, status
        FROM appointment
        WHERE doctor_id = $1
          AND appointment_date = $2
        "#,
    )
    .bind(doctor_id)
    .bind(date)
    .fetch_all(conn)
    .await
}

async fn day_slots_for_patient(
    conn: &mut PgConnection,
    patient_id: i64,
    date: NaiveDate,
) -> sqlx::Result<Vec<BookedSlot>> {
    sqlx::query_as::<_, BookedSlot>(
        r#"
        SELECT start_time, end_time, status
        FROM appointment
        WHERE patient_id = $1
          AND appointment_date = $2
        "#,
    )
    .bind(patient_id)
    .bind(date)
    .fetch_all(conn)
    .await
}

/// Does any live appointment for this doctor on this date intersect
/// [start, end)? Read-only.
pub async fn has_doctor_conflict(
    conn: &mut PgConnection,
    doctor_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> sqlx::Result<bool> {
    let slots = day_slots_for_doctor(conn, doctor_id, date).await?;
    Ok(slot_taken(&slots, start, end))
}

/// Same test scoped to the patient: one patient may not hold two live
/// overlapping bookings, regardless of doctor.
pub async fn has_patient_conflict(
    conn: &mut PgConnection,
    patient_id: i64,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> sqlx::Result<bool> {
    let slots = day_slots_for_patient(conn, patient_id, date).await?;
    Ok(slot_taken(&slots, start, end))
}

/* ============================================================
   Booking orchestrator
   ============================================================ */

#[derive(Debug)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Books an appointment: doctor conflict check, patient conflict check,
/// insert. The whole sequence runs in one transaction holding row locks on
/// the doctor and patient, so two concurrent requests for the same slot
/// serialize instead of both passing the check. Locks are always taken in
/// doctor-then-patient order.
pub async fn book(pool: &PgPool, req: NewAppointment) -> Result<i64, BookingError> {
    let mut tx = pool.begin().await?;

    let doctor: Option<i64> =
        sqlx::query_scalar(r#"SELECT doctor_id FROM doctor WHERE doctor_id = $1 FOR UPDATE"#)
            .bind(req.doctor_id)
            .fetch_optional(&mut *tx)
            .await?;
    if doctor.is_none() {
        return Err(BookingError::DoctorNotFound);
    }

    let _patient: Option<i64> =
        sqlx::query_scalar(r#"SELECT patient_id FROM patient WHERE patient_id = $1 FOR UPDATE"#)
            .bind(req.patient_id)
            .fetch_optional(&mut *tx)
            .await?;

    if has_doctor_conflict(
        &mut tx,
        req.doctor_id,
        req.appointment_date,
        req.start_time,
        req.end_time,
    )
    .await?
    {
        return Err(BookingError::DoctorBusy);
    }

    if has_patient_conflict(
        &mut tx,
        req.patient_id,
        req.appointment_date,
        req.start_time,
        req.end_time,
    )
    .await?
    {
        return Err(BookingError::PatientBusy);
    }

    let status = req.status.unwrap_or(AppointmentStatus::Scheduled);
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO appointment
            (patient_id, doctor_id, appointment_date, start_time, end_time, reason, status)
        VALUES
            ($1, $2, $3, $4, $5, $6, $7)
        RETURNING appointment_id
        "#,
    )
    .bind(req.patient_id)
    .bind(req.doctor_id)
    .bind(req.appointment_date)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.reason.as_deref())
    .bind(status)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

/// What a reject request does to the stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectAction {
    MarkRejected,
    /// Already rejected; succeed without another write.
    AlreadyRejected,
}

/// Decides a reject request from the loaded row, apart from the queries:
/// only the owning doctor may reject, and a repeat reject succeeds unchanged.
pub fn reject_outcome(
    owner_id: i64,
    caller_id: i64,
    status: AppointmentStatus,
) -> Result<RejectAction, RejectError> {
    if owner_id != caller_id {
        return Err(RejectError::NotOwner);
    }
    if status == AppointmentStatus::Rejected {
        return Ok(RejectAction::AlreadyRejected);
    }
    Ok(RejectAction::MarkRejected)
}

/// Doctor rejects an appointment they own. Rejecting an already-rejected
/// appointment succeeds without touching the row.
pub async fn reject(
    pool: &PgPool,
    appointment_id: i64,
    doctor_id: i64,
) -> Result<(), RejectError> {
    let row: Option<(i64, AppointmentStatus)> = sqlx::query_as(
        r#"
        SELECT doctor_id, status
        FROM appointment
        WHERE appointment_id = $1
        "#,
    )
    .bind(appointment_id)
    .fetch_optional(pool)
    .await?;

    let Some((owner_id, status)) = row else {
        return Err(RejectError::NotFound);
    };
    match reject_outcome(owner_id, doctor_id, status)? {
        RejectAction::AlreadyRejected => return Ok(()),
        RejectAction::MarkRejected => {}
    }

    sqlx::query(
        r#"
        UPDATE appointment
        SET status = $2
        WHERE appointment_id = $1
        "#,
    )
    .bind(appointment_id)
    .bind(AppointmentStatus::Rejected)
    .execute(pool)
    .await?;

    Ok(())
}

/* ============================================================
   Appointment query service
   ============================================================ */

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentWithPatient {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub patient_name: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentWithDoctor {
    pub appointment_id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub doctor_name: String,
    pub specialization: Option<String>,
}

/// Full schedule for a doctor, newest day first. No pagination; upcoming vs
/// past partitioning is left to the caller.
pub async fn list_for_doctor(
    pool: &PgPool,
    doctor_id: i64,
) -> sqlx::Result<Vec<AppointmentWithPatient>> {
    sqlx::query_as::<_, AppointmentWithPatient>(
        r#"
        SELECT
            a.appointment_id,
            a.patient_id,
            a.doctor_id,
            a.appointment_date,
            a.start_time,
            a.end_time,
            a.reason,
            a.status,
            a.created_at,
            p.name AS patient_name
        FROM appointment a
        JOIN patient p ON p.patient_id = a.patient_id
        WHERE a.doctor_id = $1
        ORDER BY a.appointment_date DESC, a.start_time DESC
        "#,
    )
    .bind(doctor_id)
    .fetch_all(pool)
    .await
}

pub async fn list_for_patient(
    pool: &PgPool,
    patient_id: i64,
) -> sqlx::Result<Vec<AppointmentWithDoctor>> {
    sqlx::query_as::<_, AppointmentWithDoctor>(
        r#"
        SELECT
            a.appointment_id,
            a.patient_id,
            a.doctor_id,
            a.appointment_date,
            a.start_time,
            a.end_time,
            a.reason,
            a.status,
            a.created_at,
            d.name AS doctor_name,
            d.specialization
        FROM appointment a
        JOIN doctor d ON d.doctor_id = a.doctor_id
        WHERE a.patient_id = $1
        ORDER BY a.appointment_date DESC, a.start_time DESC
        "#,
    )
    .bind(patient_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    use super::{
        BookedSlot, RejectAction, RejectError, blocks_slot, overlaps, reject_outcome, slot_taken,
    };
    use crate::error::ApiError;
    use crate::models::AppointmentStatus;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(start: NaiveTime, end: NaiveTime, status: AppointmentStatus) -> BookedSlot {
        BookedSlot {
            start_time: start,
            end_time: end,
            status,
        }
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn touching_boundary_is_not_a_conflict() {
        // 09:00-10:00 then 10:00-11:00: half-open, no overlap either way.
        assert!(!overlaps(t(9, 0), t(10, 0), t(10, 0), t(11, 0)));
        assert!(!overlaps(t(10, 0), t(11, 0), t(9, 0), t(10, 0)));
    }

    #[test]
    fn partial_overlaps_collide_from_both_sides() {
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 30), t(10, 30)));
        assert!(overlaps(t(9, 30), t(10, 30), t(9, 0), t(10, 0)));
    }

    #[test]
    fn containment_collides() {
        // existing inside requested, and requested inside existing
        assert!(overlaps(t(9, 15), t(9, 45), t(9, 0), t(10, 0)));
        assert!(overlaps(t(9, 0), t(10, 0), t(9, 15), t(9, 45)));
    }

    #[test]
    fn disjoint_intervals_do_not_collide() {
        assert!(!overlaps(t(8, 0), t(9, 0), t(11, 0), t(12, 0)));
    }

    #[test]
    fn only_live_statuses_block() {
        assert!(blocks_slot(AppointmentStatus::Pending));
        assert!(blocks_slot(AppointmentStatus::Scheduled));
        assert!(blocks_slot(AppointmentStatus::Confirmed));
        assert!(blocks_slot(AppointmentStatus::Completed));
        assert!(!blocks_slot(AppointmentStatus::Cancelled));
        assert!(!blocks_slot(AppointmentStatus::Rejected));
    }

    #[test]
    fn rejected_slot_can_be_rebooked() {
        let day = [slot(t(9, 0), t(10, 0), AppointmentStatus::Rejected)];
        assert!(!slot_taken(&day, t(9, 0), t(10, 0)));
    }

    #[test]
    fn scheduled_slot_blocks_rebooking() {
        let day = [slot(t(9, 0), t(10, 0), AppointmentStatus::Scheduled)];
        assert!(slot_taken(&day, t(9, 0), t(10, 0)));
        assert!(slot_taken(&day, t(9, 30), t(10, 30)));
        assert!(!slot_taken(&day, t(10, 0), t(11, 0)));
    }

    #[test]
    fn finds_conflict_among_mixed_statuses() {
        let day = [
            slot(t(8, 0), t(9, 0), AppointmentStatus::Completed),
            slot(t(9, 0), t(10, 0), AppointmentStatus::Cancelled),
            slot(t(10, 0), t(11, 0), AppointmentStatus::Confirmed),
        ];
        // 09:00-10:00 only collides with the cancelled row, which no longer blocks.
        assert!(!slot_taken(&day, t(9, 0), t(10, 0)));
        assert!(slot_taken(&day, t(8, 30), t(9, 30)));
        assert!(slot_taken(&day, t(10, 30), t(11, 30)));
    }

    #[test]
    fn empty_day_is_free() {
        assert_eq!(slot_taken(&[], t(9, 0), t(10, 0)), false);
    }

    #[test]
    fn only_the_owning_doctor_can_reject() {
        // Appointment owned by doctor 7; doctor 9 is turned away whatever the
        // status, so the row is never written.
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Rejected,
        ] {
            assert!(matches!(
                reject_outcome(7, 9, status),
                Err(RejectError::NotOwner)
            ));
        }
    }

    #[test]
    fn rejecting_twice_succeeds_without_a_second_write() {
        assert_eq!(
            reject_outcome(7, 7, AppointmentStatus::Rejected).unwrap(),
            RejectAction::AlreadyRejected
        );
    }

    #[test]
    fn owner_reject_marks_live_statuses_rejected() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
        ] {
            assert_eq!(
                reject_outcome(7, 7, status).unwrap(),
                RejectAction::MarkRejected
            );
        }
    }

    #[test]
    fn reject_errors_map_to_not_found_and_forbidden() {
        assert!(matches!(
            ApiError::from(RejectError::NotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(RejectError::NotOwner),
            ApiError::Forbidden(_)
        ));
    }
}
