//! Cookie-backed store handler.

use super::{storage_key, CartContent, StoreManager};
use crate::config::CookieOptions;
use crate::error::CartError;
use std::collections::HashMap;

/// Minimal cookie-jar contract the embedding application implements.
///
/// The handler never touches the HTTP layer itself; it hands the jar a
/// serialized value plus the configured cookie attributes and lets the
/// application decide how to emit them.
pub trait CookieJar {
    /// Current value of the named cookie, if set.
    fn get(&self, name: &str) -> Option<String>;

    /// Set the named cookie, applying the given attributes.
    fn set(&mut self, name: &str, value: String, options: &CookieOptions);

    /// Delete the named cookie.
    fn remove(&mut self, name: &str);
}

/// In-memory jar for tests and non-HTTP contexts. Attributes are accepted
/// and ignored.
#[derive(Debug, Default)]
pub struct MemoryJar {
    cookies: HashMap<String, String>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: String, _options: &CookieOptions) {
        self.cookies.insert(name.to_string(), value);
    }

    fn remove(&mut self, name: &str) {
        self.cookies.remove(name);
    }
}

/// Store handler persisting cart content as a JSON cookie value.
#[derive(Debug)]
pub struct CookieStore<J: CookieJar> {
    jar: J,
    options: CookieOptions,
    key: String,
}

impl<J: CookieJar> CookieStore<J> {
    pub fn new(jar: J, options: CookieOptions) -> Self {
        Self {
            jar,
            options,
            key: String::new(),
        }
    }

    /// The jar this store writes through, for inspection.
    pub fn jar(&self) -> &J {
        &self.jar
    }
}

impl<J: CookieJar> StoreManager for CookieStore<J> {
    fn init(&mut self, cart_id: &str) -> Result<bool, CartError> {
        self.key = storage_key(cart_id);
        if !self.has() {
            self.write(&CartContent::new())?;
        }
        Ok(true)
    }

    fn has(&self) -> bool {
        self.jar.get(&self.key).is_some()
    }

    fn read(&self) -> Result<CartContent, CartError> {
        match self.jar.get(&self.key) {
            Some(value) => Ok(serde_json::from_str(&value)?),
            None => Ok(CartContent::new()),
        }
    }

    fn write(&mut self, content: &CartContent) -> Result<(), CartError> {
        let value = serde_json::to_string(content)?;
        self.jar.set(&self.key, value, &self.options);
        Ok(())
    }

    fn remove(&mut self) {
        self.jar.remove(&self.key);
    }
}
