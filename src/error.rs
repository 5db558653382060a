//! Cart error types.

use thiserror::Error;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Malformed item construction input.
    #[error("Invalid cart item: {0}")]
    InvalidItem(String),

    /// An operation referenced a row id that is not in the cart.
    #[error("The cart does not contain rowId {0}")]
    InvalidRowId(String),

    /// The backing store could not be prepared for the instance.
    #[error("Store could not be initialized for instance {0}")]
    StoreInitialization(String),

    /// The configured handler does not satisfy the store contract.
    #[error("Invalid handler configuration: {0}")]
    InvalidHandlerConfiguration(String),

    /// Store payload (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
