//! Session-backed store handler.

use super::{storage_key, CartContent, StoreManager};
use crate::error::CartError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to an ambient in-process session.
///
/// Every store created from the same handle shares the same underlying
/// map, the way separate carts in one request share the session. A
/// disabled handle models an environment where the session mechanism is
/// unavailable; stores bound to it fail initialization.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

#[derive(Debug)]
struct SessionState {
    enabled: bool,
    values: HashMap<String, Value>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            enabled: true,
            values: HashMap::new(),
        }
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle whose session mechanism is unavailable.
    pub fn disabled() -> Self {
        let handle = Self::new();
        handle.lock().enabled = false;
        handle
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A poisoned lock only means another holder panicked mid-access;
        // the map itself is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Store handler persisting cart content in a shared session.
#[derive(Debug)]
pub struct SessionStore {
    session: SessionHandle,
    key: String,
}

impl SessionStore {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
            key: String::new(),
        }
    }
}

impl StoreManager for SessionStore {
    fn init(&mut self, cart_id: &str) -> Result<bool, CartError> {
        if !self.session.is_enabled() {
            return Ok(false);
        }
        self.key = storage_key(cart_id);
        if !self.has() {
            self.write(&CartContent::new())?;
        }
        Ok(true)
    }

    fn has(&self) -> bool {
        self.session.lock().values.contains_key(&self.key)
    }

    fn read(&self) -> Result<CartContent, CartError> {
        match self.session.lock().values.get(&self.key) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(CartContent::new()),
        }
    }

    fn write(&mut self, content: &CartContent) -> Result<(), CartError> {
        let value = serde_json::to_value(content)?;
        self.session.lock().values.insert(self.key.clone(), value);
        Ok(())
    }

    fn remove(&mut self) {
        self.session.lock().values.remove(&self.key);
    }
}
