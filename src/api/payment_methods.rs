//! Payment method API handlers
//!
//! Contains HTTP request handlers for payment method CRUD operations.

use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::models::{EntityId, PaymentMethod};
use crate::services::PaymentMethodService;
use crate::state::SharedState;
use crate::validation::validate_payment_method;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::info;

/// GET /api/oneup/v1/paymentmethod - List all payment methods
pub async fn list_payment_methods(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PaymentMethod>>, AppError> {
    let mut uow = state.db.read_only().await?;
    let methods = PaymentMethodService::new(&mut *uow)
        .get_all_payment_methods()
        .await?;
    uow.finish().await?;

    Ok(Json(methods))
}

/// GET /api/oneup/v1/paymentmethod/:id - Get a payment method
///
/// Responds 200 with an empty body when there is none.
pub async fn get_payment_method(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Response, AppError> {
    let mut uow = state.db.read_only().await?;
    let method = PaymentMethodService::new(&mut *uow)
        .get_payment_method_by_id(id)
        .await?;
    uow.finish().await?;

    Ok(match method {
        Some(method) => Json(method).into_response(),
        None => StatusCode::OK.into_response(),
    })
}

/// POST /api/oneup/v1/paymentmethod - Create a payment method
pub async fn create_payment_method(
    State(state): State<SharedState>,
    ApiJson(method): ApiJson<PaymentMethod>,
) -> Result<(StatusCode, Json<PaymentMethod>), AppError> {
    validate_payment_method(&method)?;

    let mut uow = state.db.read_write().await?;
    let created = PaymentMethodService::new(&mut *uow)
        .save_payment_method(method)
        .await?;
    uow.finish().await?;

    info!(payment_method_id = ?created.id, "Payment method created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/oneup/v1/paymentmethod/:id - Replace a payment method
pub async fn update_payment_method(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
    ApiJson(method): ApiJson<PaymentMethod>,
) -> Result<Json<PaymentMethod>, AppError> {
    validate_payment_method(&method)?;

    let mut uow = state.db.read_write().await?;
    let updated = PaymentMethodService::new(&mut *uow)
        .update_payment_method(id, method)
        .await?;
    uow.finish().await?;

    Ok(Json(updated))
}

/// DELETE /api/oneup/v1/paymentmethod/:id - Delete a payment method
pub async fn delete_payment_method(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.db.read_write().await?;
    PaymentMethodService::new(&mut *uow)
        .delete_payment_method(id)
        .await?;
    uow.finish().await?;

    info!(payment_method_id = id, "Payment method deleted");
    Ok(StatusCode::OK)
}
