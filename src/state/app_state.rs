// Application state
// Shared by every handler: the database handle

use crate::db::Database;
use std::sync::Arc;

/// State handed to every request handler
///
/// Holds no mutable data; each request works inside its own transaction.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Database,
}

/// Reference-counted handle used as the router state
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create shared state from a connected database
    pub fn new(db: Database) -> SharedState {
        Arc::new(Self { db })
    }
}
