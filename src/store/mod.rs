//! Pluggable persistence backends for cart content.
//!
//! The cart is a stateless façade; the store bound to it is the durable
//! owner of the item mapping. Every mutating operation on the cart is a
//! single read-modify-write cycle against the store, and a concurrent
//! writer on the same instance is a lost-update race the store may or may
//! not resolve — the core assumes single-writer-at-a-time usage.

mod cookie;
mod memory;
mod session;

pub use cookie::{CookieJar, CookieStore, MemoryJar};
pub use memory::MemoryStore;
pub use session::{SessionHandle, SessionStore};

use crate::error::CartError;
use crate::item::CartItem;
use indexmap::IndexMap;

/// The full persisted mapping for one cart instance: row id to item,
/// insertion order preserved.
pub type CartContent = IndexMap<String, CartItem>;

/// Persistence backend contract for one cart instance partition.
pub trait StoreManager {
    /// Prepare backing storage for the given partition key, seeding an
    /// empty mapping when none exists. Returns `false` when the backend
    /// cannot be made ready (the cart raises a fatal initialization error).
    fn init(&mut self, cart_id: &str) -> Result<bool, CartError>;

    /// Whether any content exists for the current partition.
    fn has(&self) -> bool;

    /// The stored mapping for the current partition.
    fn read(&self) -> Result<CartContent, CartError>;

    /// Persist a full replacement mapping.
    fn write(&mut self, content: &CartContent) -> Result<(), CartError>;

    /// Delete all content for the current partition.
    fn remove(&mut self);
}

/// Storage key for a cart partition.
pub(crate) fn storage_key(cart_id: &str) -> String {
    format!("cart:{cart_id}")
}
