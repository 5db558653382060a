//! The Buyable collaborator contract.

use crate::item::{CartItemOptions, ItemId};

/// A product-like object that can be placed in the cart directly.
///
/// Each accessor receives the selected options, so implementations can
/// expose option-dependent values (e.g. a size surcharge on the price).
pub trait Buyable {
    /// Identifier of the item.
    fn identifier(&self, options: &CartItemOptions) -> ItemId;

    /// Description or title of the item.
    fn description(&self, options: &CartItemOptions) -> String;

    /// Unit price of the item, without tax.
    fn price(&self, options: &CartItemOptions) -> f64;
}
