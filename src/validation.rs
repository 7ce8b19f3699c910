//! Request validation rules
//!
//! Presence checks applied by the handlers before anything is persisted.
//! Each rule is public so it can be run outside its handler too.

use crate::error::AppError;
use crate::models::{Device, PaymentMethod};

/// A device must carry its patient link
pub fn validate_device(device: &Device) -> Result<(), AppError> {
    if device.patient_id.is_none() {
        return Err(AppError::Validation("Patient is required".to_string()));
    }
    Ok(())
}

/// A payment method needs a card number that is not blank
pub fn validate_payment_method(method: &PaymentMethod) -> Result<(), AppError> {
    match method.card_number.as_deref() {
        Some(card_number) if !card_number.trim().is_empty() => Ok(()),
        _ => Err(AppError::Validation("Card Number is required".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_device() {
        let mut device = Device::new(2);
        match validate_device(&device) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Patient is required"),
            other => panic!("Expected Validation error, got: {:?}", other),
        }

        device.patient_id = Some(1);
        assert!(validate_device(&device).is_ok());
    }

    #[test]
    fn test_validate_payment_method() {
        assert!(validate_payment_method(&PaymentMethod::new("4111111111111111")).is_ok());
        assert!(validate_payment_method(&PaymentMethod::new(" 4111 ")).is_ok());

        for blank in ["", "   ", "\t\n"] {
            let result = validate_payment_method(&PaymentMethod::new(blank));
            assert!(
                matches!(result, Err(AppError::Validation(ref msg)) if msg == "Card Number is required"),
                "{:?} should be rejected",
                blank
            );
        }

        let missing = PaymentMethod::default();
        assert!(validate_payment_method(&missing).is_err());
    }
}
