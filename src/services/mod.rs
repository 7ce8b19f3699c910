//! Domain services
//!
//! Thin orchestration over the repository traits, handed a store explicitly
//! by each handler.

pub mod device;
pub mod payment_method;

pub use device::DeviceService;
pub use payment_method::PaymentMethodService;

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory store implementing every repository trait

    use crate::db::{
        DbResult, DeviceRepository, PatientRepository, PaymentMethodRepository, UserRepository,
    };
    use crate::models::{Device, EntityId, Patient, PaymentMethod, User};
    use async_trait::async_trait;
    use std::collections::BTreeMap;

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        devices: BTreeMap<EntityId, Device>,
        patients: BTreeMap<EntityId, Patient>,
        users: BTreeMap<EntityId, User>,
        payment_methods: BTreeMap<EntityId, PaymentMethod>,
        next_id: EntityId,
    }

    impl MemoryStore {
        pub fn add_user(&mut self, id: EntityId, email: &str) {
            self.users.insert(
                id,
                User {
                    id,
                    email: email.to_string(),
                },
            );
        }

        pub fn add_patient(&mut self, id: EntityId, user_id: Option<EntityId>) {
            self.patients.insert(
                id,
                Patient {
                    id,
                    user_id,
                    first_name: format!("Patient {}", id),
                    last_name: String::new(),
                },
            );
        }

        fn generate_id(&mut self) -> EntityId {
            self.next_id += 1;
            self.next_id
        }
    }

    #[async_trait]
    impl DeviceRepository for MemoryStore {
        async fn find_all(&mut self) -> DbResult<Vec<Device>> {
            Ok(self.devices.values().cloned().collect())
        }

        async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Device>> {
            Ok(self.devices.get(&id).cloned())
        }

        async fn find_by_patient_id(&mut self, patient_id: EntityId) -> DbResult<Option<Device>> {
            Ok(self
                .devices
                .values()
                .find(|d| d.patient_id == Some(patient_id))
                .cloned())
        }

        async fn save(&mut self, device: &Device) -> DbResult<Device> {
            let mut saved = device.clone();
            let id = match saved.id {
                Some(id) => id,
                None => self.generate_id(),
            };
            saved.id = Some(id);
            self.devices.insert(id, saved.clone());
            Ok(saved)
        }

        async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()> {
            self.devices.remove(&id);
            Ok(())
        }
    }

    #[async_trait]
    impl PatientRepository for MemoryStore {
        async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<Patient>> {
            Ok(self.patients.get(&id).cloned())
        }

        async fn find_by_user_id(&mut self, user_id: EntityId) -> DbResult<Option<Patient>> {
            Ok(self
                .patients
                .values()
                .find(|p| p.user_id == Some(user_id))
                .cloned())
        }
    }

    #[async_trait]
    impl UserRepository for MemoryStore {
        async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<User>> {
            Ok(self.users.get(&id).cloned())
        }
    }

    #[async_trait]
    impl PaymentMethodRepository for MemoryStore {
        async fn find_all(&mut self) -> DbResult<Vec<PaymentMethod>> {
            Ok(self.payment_methods.values().cloned().collect())
        }

        async fn find_by_id(&mut self, id: EntityId) -> DbResult<Option<PaymentMethod>> {
            Ok(self.payment_methods.get(&id).cloned())
        }

        async fn save(&mut self, method: &PaymentMethod) -> DbResult<PaymentMethod> {
            let mut saved = method.clone();
            let id = match saved.id {
                Some(id) => id,
                None => self.generate_id(),
            };
            saved.id = Some(id);
            self.payment_methods.insert(id, saved.clone());
            Ok(saved)
        }

        async fn delete_by_id(&mut self, id: EntityId) -> DbResult<()> {
            self.payment_methods.remove(&id);
            Ok(())
        }
    }
}
