//! Persistence layer
//!
//! SQLite pool management, request-scoped transactions and the repository
//! traits the services depend on.

pub mod error;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, TxMode, UnitOfWork};
pub use repository::{DeviceRepository, PatientRepository, PaymentMethodRepository, UserRepository};
