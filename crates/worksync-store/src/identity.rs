//! Current-identity slot

use std::sync::Arc;
use tracing::{debug, warn};
use worksync_api::Employee;

use crate::{KeyValueStore, StoreResult, STORAGE_KEY_USER};

/// Persists who is logged in between invocations
pub struct IdentityStore {
    kv: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// The stored identity; unreadable data counts as logged out
    pub fn current(&self) -> StoreResult<Option<Employee>> {
        let Some(json) = self.kv.get(STORAGE_KEY_USER)? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(employee) => Ok(Some(employee)),
            Err(e) => {
                warn!(error = %e, "Identity slot is corrupt, treating as logged out");
                Ok(None)
            }
        }
    }

    pub fn set(&self, employee: &Employee) -> StoreResult<()> {
        let json = serde_json::to_string(employee)?;
        self.kv.set(STORAGE_KEY_USER, &json)?;
        debug!(employee_id = %employee.id, "Identity stored");
        Ok(())
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.kv.remove(STORAGE_KEY_USER)
    }
}
