use crate::models::AppState;
use axum::Router;

pub mod appointment_routes;
pub mod auth_routes;
pub mod doctor_routes;
pub mod health_routes;
pub mod medicine_routes;
pub mod ward_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth_routes::router())
        .nest("/api/appointments", appointment_routes::router())
        .nest("/api/doctors", doctor_routes::router())
        .nest("/api/medicines", medicine_routes::router())
        .nest("/api/wards", ward_routes::router())
        .merge(health_routes::router())
        .with_state(state)
}
