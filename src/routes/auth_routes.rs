// src/routes/auth_routes.rs

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{hash_password, sign_token, verify_password},
    error::ApiError,
    models::{AppState, Role},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register/patient", post(register_patient))
        .route("/register/doctor", post(register_doctor))
        .route("/login", post(login))
}

/* ============================================================
   DTOs
   ============================================================ */

/// Registration bodies keep the capitalized field names the dashboard sends.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterPatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub role: Option<String>,
    pub email_or_contact: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub id: i64,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub id: i64,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    name: String,
    password_hash: String,
}

fn missing_fields() -> ApiError {
    ApiError::BadRequest("Missing fields".into())
}

fn issue_token(id: i64, role: Role, state: &AppState) -> Result<String, ApiError> {
    sign_token(id, role, &state.jwt).map_err(|e| ApiError::Internal(format!("token error: {e}")))
}

/// A unique-violation from the email index is a duplicate registration, not a
/// server fault; two same-email requests can race past the pre-check, the
/// index cannot be raced.
fn map_registration_error(e: sqlx::Error) -> ApiError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            ApiError::Conflict("Email already registered".into())
        }
        _ => ApiError::Internal(format!("db error: {e}")),
    }
}

/* ============================================================
   POST /register/patient
   ============================================================ */

pub async fn register_patient(
    State(state): State<AppState>,
    Json(req): Json<RegisterPatientRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
        return Err(missing_fields());
    };
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(missing_fields());
    }

    let existing: Option<i64> =
        sqlx::query_scalar(r#"SELECT patient_id FROM patient WHERE email = $1"#)
            .bind(email)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&password).map_err(|e| ApiError::Internal(e))?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO patient (name, age, gender, contact, address, email, password_hash)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING patient_id
        "#,
    )
    .bind(name)
    .bind(req.age)
    .bind(req.gender.as_deref())
    .bind(req.contact.as_deref())
    .bind(req.address.as_deref())
    .bind(email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(map_registration_error)?;

    let token = issue_token(id, Role::Patient, &state)?;
    Ok(Json(RegisterResponse {
        token,
        id,
        role: Role::Patient,
    }))
}

/* ============================================================
   POST /register/doctor
   ============================================================ */

pub async fn register_doctor(
    State(state): State<AppState>,
    Json(req): Json<RegisterDoctorRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
        return Err(missing_fields());
    };
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(missing_fields());
    }

    let password_hash = hash_password(&password).map_err(|e| ApiError::Internal(e))?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO doctor (name, specialization, contact, email, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING doctor_id
        "#,
    )
    .bind(name)
    .bind(req.specialization.as_deref())
    .bind(req.contact.as_deref())
    .bind(email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(map_registration_error)?;

    let token = issue_token(id, Role::Doctor, &state)?;
    Ok(Json(RegisterResponse {
        token,
        id,
        role: Role::Doctor,
    }))
}

/* ============================================================
   POST /login
   ============================================================ */

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(role_tag), Some(email_or_contact), Some(password)) =
        (req.role, req.email_or_contact, req.password)
    else {
        return Err(missing_fields());
    };
    let email_or_contact = email_or_contact.trim();
    if role_tag.is_empty() || email_or_contact.is_empty() || password.is_empty() {
        return Err(missing_fields());
    }

    let Some(role) = Role::from_tag(&role_tag) else {
        return Err(ApiError::BadRequest("Unknown role".into()));
    };

    // admin and doctor both resolve to the doctor table
    let acct = role.account_table();
    let sql = format!(
        r#"
        SELECT {id} AS id, name, password_hash
        FROM {table}
        WHERE email = $1 OR contact = $1
        LIMIT 1
        "#,
        id = acct.id_column,
        table = acct.table,
    );

    let row: Option<AccountRow> = sqlx::query_as::<_, AccountRow>(&sql)
        .bind(email_or_contact)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| ApiError::Internal(format!("db error: {e}")))?;

    let Some(account) = row else {
        return Err(ApiError::NotFound("User not found".into()));
    };

    if !verify_password(&password, &account.password_hash) {
        return Err(ApiError::invalid_credentials());
    }

    let token = issue_token(account.id, role, &state)?;
    Ok(Json(LoginResponse {
        token,
        id: account.id,
        role,
        name: account.name,
    }))
}
