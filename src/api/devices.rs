//! Device API handlers
//!
//! Each handler runs inside its own `UnitOfWork`: read-only for lookups,
//! read-write for create and delete.

use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::models::{Device, EntityId, Patient};
use crate::services::DeviceService;
use crate::state::SharedState;
use crate::validation::validate_device;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::info;

/// GET /api/oneup/v1/devices - List all devices
pub async fn list_devices(State(state): State<SharedState>) -> Result<Json<Vec<Device>>, AppError> {
    let mut uow = state.db.read_only().await?;
    let devices = DeviceService::new(&mut *uow).get_all_devices().await?;
    uow.finish().await?;

    Ok(Json(devices))
}

/// GET /api/oneup/v1/devices/:id - Get a device by id
pub async fn get_device(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Json<Device>, AppError> {
    let mut uow = state.db.read_only().await?;
    let device = DeviceService::new(&mut *uow).get_device_by_id(id).await?;
    uow.finish().await?;

    Ok(Json(device))
}

/// GET /api/oneup/v1/devices/:id/patient - Get the patient owning a device
///
/// A missing patient is a bare 404, not an error body.
pub async fn get_patient_by_device_id(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Response, AppError> {
    let mut uow = state.db.read_only().await?;
    let patient: Option<Patient> = DeviceService::new(&mut *uow)
        .get_patient_by_device_id(id)
        .await?;
    uow.finish().await?;

    Ok(match patient {
        Some(patient) => Json(patient).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// GET /api/oneup/v1/device/users/:id - Get the device of a user's patient record
pub async fn get_device_by_user_id(
    State(state): State<SharedState>,
    Path(user_id): Path<EntityId>,
) -> Result<Json<Device>, AppError> {
    let mut uow = state.db.read_only().await?;
    let mut service = DeviceService::new(&mut *uow);

    if service.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "User with id: {} not found",
            user_id
        )));
    }

    let device = service
        .get_device_by_user_id(user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Device with user id: {} not found", user_id))
        })?;
    uow.finish().await?;

    Ok(Json(device))
}

/// POST /api/oneup/v1/device/:patientId - Create a device for a patient
pub async fn create_device(
    State(state): State<SharedState>,
    Path(patient_id): Path<EntityId>,
    ApiJson(mut device): ApiJson<Device>,
) -> Result<(StatusCode, Json<Device>), AppError> {
    let mut uow = state.db.read_write().await?;
    let mut service = DeviceService::new(&mut *uow);

    let patient = service
        .find_patient(patient_id)
        .await?
        .ok_or_else(|| AppError::Validation("Patient not found".to_string()))?;

    device.id = None;
    device.assign_to(&patient);
    validate_device(&device)?;

    let created = service.save_device(&device).await?;
    uow.finish().await?;

    info!(device_id = ?created.id, patient_id, "Device created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /api/oneup/v1/device/:id - Delete a device
pub async fn delete_device(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<(StatusCode, String), AppError> {
    let mut uow = state.db.read_write().await?;
    DeviceService::new(&mut *uow).delete_device(id).await?;
    uow.finish().await?;

    info!(device_id = id, "Device deleted");
    Ok((StatusCode::OK, format!("Device with id: {} was deleted", id)))
}
