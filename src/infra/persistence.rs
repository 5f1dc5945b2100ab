//! Access to every store the services need, whichever backend backs them.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{AccountStore, MemoryStore, SeaStore, Store};
use crate::domain::{AccessLog, Bot, ForgotPassword};

/// Store handles shared by the services
#[derive(Clone)]
pub struct Persistence {
    pub accounts: Arc<dyn AccountStore>,
    pub access_logs: Arc<dyn Store<AccessLog>>,
    pub forgot_passwords: Arc<dyn Store<ForgotPassword>>,
    pub bots: Arc<dyn Store<Bot>>,
}

impl Persistence {
    /// Stores backed by a database connection
    pub fn sea(db: DatabaseConnection) -> Self {
        Self {
            accounts: Arc::new(SeaStore::new(db.clone())),
            access_logs: Arc::new(SeaStore::new(db.clone())),
            forgot_passwords: Arc::new(SeaStore::new(db.clone())),
            bots: Arc::new(SeaStore::new(db)),
        }
    }

    /// Empty in-process stores
    pub fn memory() -> Self {
        Self {
            accounts: Arc::new(MemoryStore::new()),
            access_logs: Arc::new(MemoryStore::new()),
            forgot_passwords: Arc::new(MemoryStore::new()),
            bots: Arc::new(MemoryStore::new()),
        }
    }
}
