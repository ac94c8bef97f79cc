// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::error;

use shared_models::error::AppError;
use shared_utils::{ValidatedJson, ValidatedQuery};

use crate::models::{
    AppointmentError, AppointmentListQuery, CreateAppointmentRequest, SchedulingRejection,
};
use crate::services::booking::AppointmentBookingService;

fn to_app_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
        AppointmentError::Rejected(reason @ SchedulingRejection::Conflict) => {
            AppError::Conflict(reason.to_string())
        },
        AppointmentError::Rejected(reason) => AppError::BadRequest(reason.to_string()),
        AppointmentError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        AppointmentError::DatabaseError(msg) => {
            error!("Appointment storage failure: {}", msg);
            AppError::Database(msg)
        }
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    ValidatedJson(request): ValidatedJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let appointment = service.schedule_appointment(request).await
        .map_err(to_app_error)?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
    ValidatedQuery(query): ValidatedQuery<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = service
        .list_appointments_for_date(query.apt_date, query.doctor_id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(json!(appointments)))
}
