//! Payment method service

use crate::db::PaymentMethodRepository;
use crate::error::AppError;
use crate::models::{EntityId, PaymentMethod};

/// CRUD over payment methods
pub struct PaymentMethodService<'c, C: ?Sized> {
    store: &'c mut C,
}

impl<'c, C> PaymentMethodService<'c, C>
where
    C: PaymentMethodRepository + ?Sized,
{
    /// Wrap a store (usually the connection of a `UnitOfWork`)
    pub fn new(store: &'c mut C) -> Self {
        Self { store }
    }

    /// All payment methods
    pub async fn get_all_payment_methods(&mut self) -> Result<Vec<PaymentMethod>, AppError> {
        Ok(self.store.find_all().await?)
    }

    /// Payment method by id. Absence is a normal result.
    pub async fn get_payment_method_by_id(
        &mut self,
        id: EntityId,
    ) -> Result<Option<PaymentMethod>, AppError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Store a new payment method under a generated id
    pub async fn save_payment_method(
        &mut self,
        mut method: PaymentMethod,
    ) -> Result<PaymentMethod, AppError> {
        method.id = None;
        Ok(self.store.save(&method).await?)
    }

    /// Replace the payment method stored under `id`, creating it if missing
    pub async fn update_payment_method(
        &mut self,
        id: EntityId,
        mut method: PaymentMethod,
    ) -> Result<PaymentMethod, AppError> {
        method.id = Some(id);
        Ok(self.store.save(&method).await?)
    }

    /// Delete a payment method. Missing ids are ignored.
    pub async fn delete_payment_method(&mut self, id: EntityId) -> Result<(), AppError> {
        Ok(self.store.delete_by_id(id).await?)
    }
}
