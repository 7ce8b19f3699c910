//! API module
//!
//! Contains HTTP request handlers for the device and payment method endpoints

pub mod devices;
pub mod extract;
pub mod payment_methods;

use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};

/// Prefix shared by every versioned endpoint
pub const API_PREFIX: &str = "/api/oneup/v1";

/// Build the versioned API router
pub fn router(state: SharedState) -> Router {
    let v1 = Router::new()
        // Devices
        .route("/devices", get(devices::list_devices))
        .route("/devices/:id", get(devices::get_device))
        .route(
            "/devices/:id/patient",
            get(devices::get_patient_by_device_id),
        )
        .route("/device/users/:id", get(devices::get_device_by_user_id))
        // POST takes a patient id, DELETE a device id
        .route(
            "/device/:id",
            post(devices::create_device).delete(devices::delete_device),
        )
        // Payment methods
        .route(
            "/paymentmethod",
            get(payment_methods::list_payment_methods)
                .post(payment_methods::create_payment_method),
        )
        .route(
            "/paymentmethod/:id",
            get(payment_methods::get_payment_method)
                .put(payment_methods::update_payment_method)
                .delete(payment_methods::delete_payment_method),
        );

    Router::new().nest(API_PREFIX, v1).with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for handler tests backed by a temporary SQLite file

    use crate::config::DatabaseConfig;
    use crate::db::Database;
    use crate::models::EntityId;
    use crate::state::{AppState, SharedState};
    use tempfile::TempDir;

    pub async fn create_test_state() -> (TempDir, SharedState) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("oneup.db").to_string_lossy().to_string(),
            max_connections: 2,
        };
        let db = Database::connect(&config).await.unwrap();
        (dir, AppState::new(db))
    }

    pub async fn insert_user(state: &SharedState, email: &str) -> EntityId {
        let (id,): (EntityId,) =
            sqlx::query_as("INSERT INTO users (email) VALUES (?) RETURNING id")
                .bind(email)
                .fetch_one(state.db.pool())
                .await
                .unwrap();
        id
    }

    pub async fn insert_patient(state: &SharedState, user_id: Option<EntityId>) -> EntityId {
        let (id,): (EntityId,) = sqlx::query_as(
            "INSERT INTO patients (user_id, first_name, last_name) VALUES (?, 'Ana', 'Quispe') RETURNING id",
        )
        .bind(user_id)
        .fetch_one(state.db.pool())
        .await
        .unwrap();
        id
    }
}
