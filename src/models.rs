//! Domain data models
//!
//! Defines the entities persisted by the backend and their JSON shapes.
//! The Device↔Patient link is stored once, as `Device::patient_id`; the
//! reverse direction is a lookup, never an embedded object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Identifier type shared by every entity (SQLite INTEGER PRIMARY KEY)
pub type EntityId = i64;

/// A tracked piece of equipment, exclusively linked to one Patient
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Generated identifier (`None` until persisted)
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Number of units of the product handed out
    #[serde(default)]
    pub product_quantity: i32,
    /// Owning patient. Accepted on input, never serialized back out.
    #[serde(default, skip_serializing)]
    pub patient_id: Option<EntityId>,
}

impl Device {
    /// Create an unsaved device with the given quantity and no owner
    pub fn new(product_quantity: i32) -> Self {
        Self {
            id: None,
            product_quantity,
            patient_id: None,
        }
    }

    /// Link this device to its owning patient
    pub fn assign_to(&mut self, patient: &Patient) {
        self.patient_id = Some(patient.id);
    }
}

/// Owner of at most one Device. Managed by the patient subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Patient identifier
    pub id: EntityId,
    /// Account this patient record belongs to, if any
    pub user_id: Option<EntityId>,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// Application account. The device core only checks that it exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// User identifier
    pub id: EntityId,
    /// Login email
    pub email: String,
}

/// A billing record keyed by card number
///
/// Fields other than `id` and `cardNumber` are kept as an opaque document and
/// echoed back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    /// Generated identifier (`None` until persisted)
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Card number as entered by the client
    #[serde(default)]
    pub card_number: Option<String>,
    /// Passthrough fields
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl PaymentMethod {
    /// Create an unsaved payment method with no extra fields
    pub fn new(card_number: impl Into<String>) -> Self {
        Self {
            id: None,
            card_number: Some(card_number.into()),
            details: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_device_never_serializes_patient() {
        let device = Device {
            id: Some(7),
            product_quantity: 3,
            patient_id: Some(5),
        };
        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value, json!({ "id": 7, "productQuantity": 3 }));
    }

    #[test]
    fn test_device_accepts_patient_on_input() {
        let device: Device =
            serde_json::from_value(json!({ "productQuantity": 2, "patientId": 9 })).unwrap();
        assert_eq!(device.id, None);
        assert_eq!(device.product_quantity, 2);
        assert_eq!(device.patient_id, Some(9));
    }

    #[test]
    fn test_assign_to_patient() {
        let patient = Patient {
            id: 4,
            user_id: None,
            first_name: "Ana".to_string(),
            last_name: "Quispe".to_string(),
        };
        let mut device = Device::new(1);
        device.assign_to(&patient);
        assert_eq!(device.patient_id, Some(4));
    }

    #[test]
    fn test_payment_method_keeps_extra_fields() {
        let input = json!({
            "cardNumber": "4111111111111111",
            "cardHolder": "Ana Quispe",
            "expiry": "12/29"
        });
        let method: PaymentMethod = serde_json::from_value(input).unwrap();
        assert_eq!(method.card_number.as_deref(), Some("4111111111111111"));
        assert_eq!(method.details.len(), 2);
        assert_eq!(method.details["cardHolder"], json!("Ana Quispe"));

        let output = serde_json::to_value(&method).unwrap();
        assert_eq!(output["expiry"], json!("12/29"));
        assert_eq!(output["id"], Value::Null);
    }

    #[test]
    fn test_payment_method_missing_card_number() {
        let method: PaymentMethod = serde_json::from_value(json!({})).unwrap();
        assert_eq!(method.card_number, None);
        assert!(method.details.is_empty());
    }
}
