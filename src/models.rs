use serde::{Deserialize, Serialize};

use crate::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub jwt: JwtKeys,
}

/// Role carried in the bearer token. `admin` accounts live in the doctor
/// table; the tag only widens what the token may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

/// Which table and key column a role authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountTable {
    pub table: &'static str,
    pub id_column: &'static str,
}

pub const PATIENT_TABLE: AccountTable = AccountTable {
    table: "patient",
    id_column: "patient_id",
};
pub const DOCTOR_TABLE: AccountTable = AccountTable {
    table: "doctor",
    id_column: "doctor_id",
};

impl Role {
    pub fn from_tag(tag: &str) -> Option<Role> {
        match tag {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn account_table(self) -> AccountTable {
        match self {
            Role::Patient => PATIENT_TABLE,
            Role::Doctor | Role::Admin => DOCTOR_TABLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[repr(i16)]
pub enum AppointmentStatus {
    Pending = 0,
    Scheduled = 1,
    Confirmed = 2,
    Cancelled = 3,
    Completed = 4,
    Rejected = 5,
}

/* -------------------------
   DB Row Models
--------------------------*/

/// Public directory entry: everything but the password hash.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DoctorRow {
    pub doctor_id: i64,
    pub name: String,
    pub specialization: Option<String>,
    pub contact: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRow {
    pub medicine_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WardRow {
    pub ward_id: i64,
    pub ward_name: String,
    pub capacity: i32,
    pub assigned_patient_id: Option<i64>,
}

/* -------------------------
   Shared response shapes
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
