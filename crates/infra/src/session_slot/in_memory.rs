use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{PersistenceError, SessionSlot};

/// In-memory slot for tests/dev.
///
/// [`InMemorySessionSlot::set_unavailable`] makes every operation fail, like
/// storage disabled by the host.
#[derive(Debug, Default)]
pub struct InMemorySessionSlot {
    values: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl InMemorySessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), PersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> PersistenceError {
        PersistenceError::Unavailable("lock poisoned".to_string())
    }
}

impl SessionSlot for InMemorySessionSlot {
    fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.ensure_available()?;
        let values = self.values.read().map_err(|_| Self::poisoned())?;
        Ok(values.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.ensure_available()?;
        let mut values = self.values.write().map_err(|_| Self::poisoned())?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.ensure_available()?;
        let mut values = self.values.write().map_err(|_| Self::poisoned())?;
        values.remove(key);
        Ok(())
    }
}
