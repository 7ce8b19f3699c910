//! Repository capability traits and their SQLite implementations
//!
//! Services are generic over these traits. `SqliteConnection` implements all
//! of them, so a [`UnitOfWork`](crate::db::UnitOfWork) can be handed to any
//! service directly.

use crate::db::error::DbResult;
use crate::models::{Device, EntityId, Patient, PaymentMethod, User};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{FromRow, SqliteConnection};
use tracing::debug;

/// Persistence operations for devices
#[async_trait]
pub trait DeviceRepository: Send {
    /// All devices, ordered by id
    async fn find_all(&mut self) -> DbResult<Vec<Device>>;

    /// Device with the given id, if any
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Device>>;

    /// Device owned by the given patient, if any
    async fn find_by_patient_id(&mut self, patient_id: EntityId) -> DbResult<Option<Device>>;

    /// Insert when `device.id` is `None`, otherwise replace the stored row
    async fn save(&mut self, device: &Device) -> DbResult<Device>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()>;
}

/// Read access to patients
#[async_trait]
pub trait PatientRepository: Send {
    /// Patient with the given id, if any
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Patient>>;

    /// Patient record belonging to the given user, if any
    async fn find_by_user_id(&mut self, user_id: EntityId) -> DbResult<Option<Patient>>;
}

/// Read access to users
#[async_trait]
pub trait UserRepository: Send {
    /// User with the given id, if any
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<User>>;
}

/// Persistence operations for payment methods
#[async_trait]
pub trait PaymentMethodRepository: Send {
    /// All payment methods, ordered by id
    async fn find_all(&mut self) -> DbResult<Vec<PaymentMethod>>;

    /// Payment method with the given id, if any
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<PaymentMethod>>;

    /// Insert when `method.id` is `None`, otherwise insert-or-replace under that id
    async fn save(&mut self, method: &PaymentMethod) -> DbResult<PaymentMethod>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()>;
}

#[async_trait]
impl DeviceRepository for SqliteConnection {
    async fn find_all(&mut self) -> DbResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            "SELECT id, product_quantity, patient_id FROM devices ORDER BY id",
        )
        .fetch_all(&mut *self)
        .await?;

        Ok(devices)
    }

    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            "SELECT id, product_quantity, patient_id FROM devices WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(device)
    }

    async fn find_by_patient_id(&mut self, patient_id: EntityId) -> DbResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            "SELECT id, product_quantity, patient_id FROM devices WHERE patient_id = ?",
        )
        .bind(patient_id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(device)
    }

    async fn save(&mut self, device: &Device) -> DbResult<Device> {
        let saved = match device.id {
            None => {
                sqlx::query_as::<_, Device>(
                    "INSERT INTO devices (product_quantity, patient_id) VALUES (?, ?) \
                     RETURNING id, product_quantity, patient_id",
                )
                .bind(device.product_quantity)
                .bind(device.patient_id)
                .fetch_one(&mut *self)
                .await?
            }
            Some(id) => {
                sqlx::query_as::<_, Device>(
                    "INSERT INTO devices (id, product_quantity, patient_id) VALUES (?, ?, ?) \
                     ON CONFLICT(id) DO UPDATE SET \
                     product_quantity = excluded.product_quantity, \
                     patient_id = excluded.patient_id \
                     RETURNING id, product_quantity, patient_id",
                )
                .bind(id)
                .bind(device.product_quantity)
                .bind(device.patient_id)
                .fetch_one(&mut *self)
                .await?
            }
        };

        debug!(device_id = ?saved.id, patient_id = ?saved.patient_id, "Saved device");
        Ok(saved)
    }

    async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await?;

        debug!(device_id = id, rows = result.rows_affected(), "Deleted device");
        Ok(())
    }
}

#[async_trait]
impl PatientRepository for SqliteConnection {
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT id, user_id, first_name, last_name FROM patients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(patient)
    }

    async fn find_by_user_id(&mut self, user_id: EntityId) -> DbResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(
            "SELECT id, user_id, first_name, last_name FROM patients WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *self)
        .await?;

        Ok(patient)
    }
}

#[async_trait]
impl UserRepository for SqliteConnection {
    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self)
            .await?;

        Ok(user)
    }
}

/// Stored shape of a payment method; `details` is a JSON object
#[derive(Debug, FromRow)]
struct PaymentMethodRow {
    id: EntityId,
    card_number: String,
    details: String,
}

impl PaymentMethodRow {
    fn into_model(self) -> DbResult<PaymentMethod> {
        let details: Map<String, Value> = serde_json::from_str(&self.details)?;
        Ok(PaymentMethod {
            id: Some(self.id),
            card_number: Some(self.card_number),
            details,
        })
    }
}

#[async_trait]
impl PaymentMethodRepository for SqliteConnection {
    async fn find_all(&mut self) -> DbResult<Vec<PaymentMethod>> {
        let rows = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, card_number, details FROM payment_methods ORDER BY id",
        )
        .fetch_all(&mut *self)
        .await?;

        rows.into_iter().map(PaymentMethodRow::into_model).collect()
    }

    async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<PaymentMethod>> {
        let row = sqlx::query_as::<_, PaymentMethodRow>(
            "SELECT id, card_number, details FROM payment_methods WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self)
        .await?;

        row.map(PaymentMethodRow::into_model).transpose()
    }

    async fn save(&mut self, method: &PaymentMethod) -> DbResult<PaymentMethod> {
        let details = serde_json::to_string(&method.details)?;

        let row = match method.id {
            None => {
                sqlx::query_as::<_, PaymentMethodRow>(
                    "INSERT INTO payment_methods (card_number, details) VALUES (?, ?) \
                     RETURNING id, card_number, details",
                )
                .bind(method.card_number.as_deref())
                .bind(details)
                .fetch_one(&mut *self)
                .await?
            }
            Some(id) => {
                sqlx::query_as::<_, PaymentMethodRow>(
                    "INSERT INTO payment_methods (id, card_number, details) VALUES (?, ?, ?) \
                     ON CONFLICT(id) DO UPDATE SET \
                     card_number = excluded.card_number, \
                     details = excluded.details \
                     RETURNING id, card_number, details",
                )
                .bind(id)
                .bind(method.card_number.as_deref())
                .bind(details)
                .fetch_one(&mut *self)
                .await?
            }
        };

        debug!(payment_method_id = row.id, "Saved payment method");
        row.into_model()
    }

    async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM payment_methods WHERE id = ?")
            .bind(id)
            .execute(&mut *self)
            .await?;

        debug!(
            payment_method_id = id,
            rows = result.rows_affected(),
            "Deleted payment method"
        );
        Ok(())
    }
}
