//! Session shopping-cart with content-addressed line items and pluggable
//! storage backends.
//!
//! The crate is built around two pieces:
//!
//! - **Identity**: every line item is keyed by a row id derived from its
//!   product identifier plus its normalized option set ([`rowid`]).
//!   Adding the same logical product twice merges quantities instead of
//!   duplicating rows; changing an item's options migrates it to a new
//!   row or merges it into an existing one.
//! - **The cart aggregate** ([`cart::Cart`]): an ordered mapping of row id
//!   to [`item::CartItem`] persisted write-through to an injected
//!   [`store::StoreManager`] (session, cookie, in-memory, or custom).
//!
//! # Example
//!
//! ```
//! use shopcart::prelude::*;
//!
//! let mut cart = Cart::new(MemoryStore::new(), CartConfig::default())?;
//!
//! let item = cart.add(
//!     ItemAttributes::new(1, "Item name", 1.0, 10.00)
//!         .with_options(CartItemOptions::from_iter([("size", "XL")])),
//! )?;
//!
//! let same_row = cart.add(
//!     ItemAttributes::new(1, "Item name", 1.0, 10.00)
//!         .with_options(CartItemOptions::from_iter([("size", "XL")])),
//! )?;
//! assert_eq!(same_row.row_id, item.row_id);
//! assert_eq!(cart.count()?, 2.0);
//! # Ok::<(), shopcart::CartError>(())
//! ```
//!
//! # Concurrency
//!
//! The core is single-threaded and synchronous: each mutation is one
//! read-modify-write cycle against the store with no locking or
//! transactions. Two concurrent writers on the same instance race; the
//! core assumes single-writer-at-a-time usage per instance.

pub mod buyable;
pub mod cart;
pub mod config;
pub mod error;
pub mod format;
pub mod item;
pub mod rowid;
pub mod store;

pub use cart::{Cart, ItemSpec, ItemUpdate, DEFAULT_INSTANCE};
pub use error::CartError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::buyable::Buyable;
    pub use crate::cart::{Cart, ItemSpec, ItemUpdate, DEFAULT_INSTANCE};
    pub use crate::config::{CartConfig, CookieOptions, FormatConfig, SameSite};
    pub use crate::error::CartError;
    pub use crate::item::{
        CartItem, CartItemOptions, CartItemRecord, ItemAttributes, ItemFields, ItemId,
        OptionValue,
    };
    pub use crate::rowid::{DefaultRowId, RowIdGenerator};
    pub use crate::store::{
        CartContent, CookieJar, CookieStore, MemoryJar, MemoryStore, SessionHandle,
        SessionStore, StoreManager,
    };
}
