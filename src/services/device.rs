//! Device service
//!
//! Delegates to the repository traits. The only logic here is null-handling
//! and the one-device-per-patient invariant.

use crate::db::{DbError, DeviceRepository, PatientRepository, UserRepository};
use crate::error::AppError;
use crate::models::{Device, EntityId, Patient, User};

/// Column carrying the Device→Patient link
const PATIENT_LINK_COLUMN: &str = "devices.patient_id";

/// Device operations over any store that can read devices, patients and users
pub struct DeviceService<'c, C: ?Sized> {
    store: &'c mut C,
}

impl<'c, C> DeviceService<'c, C>
where
    C: DeviceRepository + PatientRepository + UserRepository + ?Sized,
{
    /// Wrap a store (usually the connection of a `UnitOfWork`)
    pub fn new(store: &'c mut C) -> Self {
        Self { store }
    }

    /// All devices
    pub async fn get_all_devices(&mut self) -> Result<Vec<Device>, AppError> {
        Ok(DeviceRepository::find_all(&mut *self.store).await?)
    }

    /// Device by id, or `NotFound`
    pub async fn get_device_by_id(&mut self, id: EntityId) -> Result<Device, AppError> {
        DeviceRepository::find_by_id(&mut *self.store, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device with id: {} not found", id)))
    }

    /// Device owned by a patient, if any
    pub async fn get_device_by_patient_id(
        &mut self,
        patient_id: EntityId,
    ) -> Result<Option<Device>, AppError> {
        Ok(self.store.find_by_patient_id(patient_id).await?)
    }

    /// Device owned by the patient record of a user, if any
    ///
    /// Resolves user → patient (`patients.user_id`) → device
    /// (`devices.patient_id`).
    pub async fn get_device_by_user_id(
        &mut self,
        user_id: EntityId,
    ) -> Result<Option<Device>, AppError> {
        let Some(patient) = self.store.find_by_user_id(user_id).await? else {
            return Ok(None);
        };
        self.get_device_by_patient_id(patient.id).await
    }

    /// Patient linked to a device. `None` if either is missing.
    pub async fn get_patient_by_device_id(
        &mut self,
        id: EntityId,
    ) -> Result<Option<Patient>, AppError> {
        let Some(device) = DeviceRepository::find_by_id(&mut *self.store, id).await? else {
            return Ok(None);
        };
        match device.patient_id {
            Some(patient_id) => self.find_patient(patient_id).await,
            None => Ok(None),
        }
    }

    /// Patient by id, if any
    pub async fn find_patient(&mut self, id: EntityId) -> Result<Option<Patient>, AppError> {
        Ok(PatientRepository::find_by_id(&mut *self.store, id).await?)
    }

    /// User by id, if any
    pub async fn find_user(&mut self, id: EntityId) -> Result<Option<User>, AppError> {
        Ok(UserRepository::find_by_id(&mut *self.store, id).await?)
    }

    /// Persist a device that already carries its patient link
    ///
    /// Fails with `Validation` when the patient already owns another device.
    pub async fn save_device(&mut self, device: &Device) -> Result<Device, AppError> {
        if let Some(patient_id) = device.patient_id {
            if let Some(existing) = self.store.find_by_patient_id(patient_id).await? {
                if existing.id != device.id {
                    return Err(AppError::Validation(
                        "Patient already has a device".to_string(),
                    ));
                }
            }
        }

        DeviceRepository::save(&mut *self.store, device)
            .await
            .map_err(|e| match e {
                e if e.is_unique_violation_on(PATIENT_LINK_COLUMN) => {
                    AppError::Validation("Patient already has a device".to_string())
                }
                DbError::ForeignKeyViolation { .. } => {
                    AppError::Validation("Patient not found".to_string())
                }
                e => AppError::Database(e),
            })
    }

    /// Delete a device. Missing ids are ignored.
    pub async fn delete_device(&mut self, id: EntityId) -> Result<(), AppError> {
        Ok(DeviceRepository::delete_by_id(&mut *self.store, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::MemoryStore;

    fn store_with_patient() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.add_user(10, "ana@oneup.pe");
        store.add_patient(5, Some(10));
        store
    }

    #[tokio::test]
    async fn test_get_device_by_id_not_found() {
        let mut store = MemoryStore::default();
        let result = DeviceService::new(&mut store).get_device_by_id(42).await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Device with id: 42 not found"),
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_and_resolve_patient() {
        let mut store = store_with_patient();
        let mut service = DeviceService::new(&mut store);

        let patient = service.find_patient(5).await.unwrap().unwrap();
        let mut device = Device::new(3);
        device.assign_to(&patient);
        let saved = service.save_device(&device).await.unwrap();

        let id = saved.id.unwrap();
        let owner = service.get_patient_by_device_id(id).await.unwrap();
        assert_eq!(owner.map(|p| p.id), Some(5));
        assert_eq!(service.get_device_by_id(id).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_second_device_for_patient_rejected() {
        let mut store = store_with_patient();
        let mut service = DeviceService::new(&mut store);

        let mut first = Device::new(1);
        first.patient_id = Some(5);
        service.save_device(&first).await.unwrap();

        let mut second = Device::new(2);
        second.patient_id = Some(5);
        let result = service.save_device(&second).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(service.get_all_devices().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_device_by_user_follows_patient_link() {
        let mut store = store_with_patient();
        store.add_patient(6, None);
        let mut service = DeviceService::new(&mut store);

        let mut device = Device::new(4);
        device.patient_id = Some(5);
        let saved = service.save_device(&device).await.unwrap();

        assert_eq!(service.get_device_by_user_id(10).await.unwrap(), Some(saved));
        assert_eq!(service.get_device_by_user_id(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_patient_lookup_for_missing_device() {
        let mut store = store_with_patient();
        let mut service = DeviceService::new(&mut store);
        assert_eq!(service.get_patient_by_device_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_device_is_ok() {
        let mut store = MemoryStore::default();
        let mut service = DeviceService::new(&mut store);
        assert!(service.delete_device(1).await.is_ok());
        assert!(service.delete_device(1).await.is_ok());
    }
}
