//! In-memory store handler.

use super::{storage_key, CartContent, StoreManager};
use crate::error::CartError;
use std::collections::HashMap;

/// Plain in-memory store. The reference handler for tests and for
/// embedding the cart without any ambient session or cookie state; content
/// lives only as long as the store value itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: HashMap<String, CartContent>,
    key: String,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreManager for MemoryStore {
    fn init(&mut self, cart_id: &str) -> Result<bool, CartError> {
        self.key = storage_key(cart_id);
        if !self.has() {
            self.write(&CartContent::new())?;
        }
        Ok(true)
    }

    fn has(&self) -> bool {
        self.partitions.contains_key(&self.key)
    }

    fn read(&self) -> Result<CartContent, CartError> {
        Ok(self.partitions.get(&self.key).cloned().unwrap_or_default())
    }

    fn write(&mut self, content: &CartContent) -> Result<(), CartError> {
        self.partitions.insert(self.key.clone(), content.clone());
        Ok(())
    }

    fn remove(&mut self) {
        self.partitions.remove(&self.key);
    }
}
