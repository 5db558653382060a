//! Cart item types.

use crate::buyable::Buyable;
use crate::error::CartError;
use crate::format::number_format;
use crate::rowid::RowIdGenerator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Product identifier of a cart item.
///
/// Not unique on its own; the cart keys rows by the content-derived row id
/// computed from the identifier plus the selected options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl ItemId {
    /// Whether the identifier is the empty value rejected at construction.
    pub fn is_empty(&self) -> bool {
        match self {
            ItemId::Int(n) => *n == 0,
            ItemId::Str(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

/// A scalar option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl OptionValue {
    /// The string form, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Float(n)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

/// The selected options of a cart item.
///
/// Insertion order is preserved for display; identity derivation sorts the
/// entries by option name, so two option sets with the same entries in a
/// different order produce the same row id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemOptions(IndexMap<String, OptionValue>);

impl CartItemOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an option by name.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// Insert or replace an option. Replacing keeps the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Merge `other` over this set: existing names are overridden in place,
    /// new names are appended.
    pub fn merge(&mut self, other: CartItemOptions) {
        for (name, value) in other.0 {
            self.0.insert(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for CartItemOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Raw attributes for adding an item to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub id: ItemId,
    pub name: String,
    pub qty: f64,
    pub price: f64,
    #[serde(default)]
    pub options: CartItemOptions,
    /// Optional per-unit tax amount in the raw input. When present and the
    /// price is positive, the item's tax rate becomes `100 * tax / price`
    /// instead of the cart default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
}

impl ItemAttributes {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, qty: f64, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qty,
            price,
            options: CartItemOptions::new(),
            tax: None,
        }
    }

    pub fn with_options(mut self, options: CartItemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = Some(tax);
        self
    }
}

/// A partial field patch for an existing cart item. Unset fields keep the
/// current value; patch options are merged over the existing ones.
#[derive(Debug, Clone, Default)]
pub struct ItemFields {
    pub id: Option<ItemId>,
    pub qty: Option<f64>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub options: Option<CartItemOptions>,
}

impl ItemFields {
    pub fn id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn qty(mut self, qty: f64) -> Self {
        self.qty = Some(qty);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn options(mut self, options: CartItemOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A line item held by the cart.
///
/// The row id is a pure function of `(id, options)` at the time of the
/// last key computation; the monetary attributes `tax`, `price_tax`,
/// `subtotal`, `total` and `tax_total` are derived on read and never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Content-derived identity of this row.
    pub row_id: String,
    pub id: ItemId,
    pub name: String,
    pub qty: f64,
    /// Unit price without tax.
    pub price: f64,
    pub options: CartItemOptions,
    tax_rate: f64,
}

impl CartItem {
    /// Build an item and compute its row id with the given generator.
    ///
    /// Fails with [`CartError::InvalidItem`] when the identifier is
    /// empty/zero, the name is empty, or the price is not a finite
    /// non-negative number.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        price: f64,
        options: CartItemOptions,
        generator: &dyn RowIdGenerator,
    ) -> Result<Self, CartError> {
        let id = id.into();
        let name = name.into();
        if id.is_empty() {
            return Err(CartError::InvalidItem(
                "please supply a valid identifier".to_string(),
            ));
        }
        if name.is_empty() {
            return Err(CartError::InvalidItem(
                "please supply a valid name".to_string(),
            ));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(CartError::InvalidItem(format!(
                "please supply a valid price, got {price}"
            )));
        }
        let row_id = generator.row_id(&id, &options);
        Ok(Self {
            row_id,
            id,
            name,
            qty: 1.0,
            price,
            options,
            tax_rate: 0.0,
        })
    }

    /// Build an item from a [`Buyable`], querying identifier, description
    /// and price with the selected options.
    pub fn from_buyable(
        product: &dyn Buyable,
        options: CartItemOptions,
        generator: &dyn RowIdGenerator,
    ) -> Result<Self, CartError> {
        Self::new(
            product.identifier(&options),
            product.description(&options),
            product.price(&options),
            options,
            generator,
        )
    }

    /// Build an item from raw attributes, resolving the tax rate from the
    /// explicit `tax` amount when given, the cart default otherwise.
    pub fn from_attributes(
        attrs: ItemAttributes,
        default_tax_rate: f64,
        generator: &dyn RowIdGenerator,
    ) -> Result<Self, CartError> {
        let mut item = Self::new(attrs.id, attrs.name, attrs.price, attrs.options, generator)?;
        item.qty = attrs.qty;
        item.tax_rate = match attrs.tax {
            Some(tax) if item.price > 0.0 => 100.0 * tax / item.price,
            _ => default_tax_rate,
        };
        Ok(item)
    }

    /// Tax rate in percent applied to this row.
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// Per-unit tax amount.
    pub fn tax(&self) -> f64 {
        self.price * self.tax_rate / 100.0
    }

    /// Unit price including tax.
    pub fn price_tax(&self) -> f64 {
        self.price + self.tax()
    }

    /// Row price without tax (`qty * price`).
    pub fn subtotal(&self) -> f64 {
        self.qty * self.price
    }

    /// Row price including tax (`qty * price_tax`).
    pub fn total(&self) -> f64 {
        self.qty * self.price_tax()
    }

    /// Row tax amount (`tax * qty`).
    pub fn tax_total(&self) -> f64 {
        self.tax() * self.qty
    }

    pub fn price_formatted(&self, decimals: u32, decimal_point: &str, thousand_sep: &str) -> String {
        number_format(self.price, decimals, decimal_point, thousand_sep)
    }

    pub fn price_tax_formatted(
        &self,
        decimals: u32,
        decimal_point: &str,
        thousand_sep: &str,
    ) -> String {
        number_format(self.price_tax(), decimals, decimal_point, thousand_sep)
    }

    pub fn subtotal_formatted(
        &self,
        decimals: u32,
        decimal_point: &str,
        thousand_sep: &str,
    ) -> String {
        number_format(self.subtotal(), decimals, decimal_point, thousand_sep)
    }

    pub fn total_formatted(&self, decimals: u32, decimal_point: &str, thousand_sep: &str) -> String {
        number_format(self.total(), decimals, decimal_point, thousand_sep)
    }

    pub fn tax_formatted(&self, decimals: u32, decimal_point: &str, thousand_sep: &str) -> String {
        number_format(self.tax(), decimals, decimal_point, thousand_sep)
    }

    pub fn tax_total_formatted(
        &self,
        decimals: u32,
        decimal_point: &str,
        thousand_sep: &str,
    ) -> String {
        number_format(self.tax_total(), decimals, decimal_point, thousand_sep)
    }

    pub fn set_quantity(&mut self, qty: f64) {
        self.qty = qty;
    }

    pub fn set_tax_rate(&mut self, tax_rate: f64) {
        self.tax_rate = tax_rate;
    }

    /// Refresh id, name and price from a [`Buyable`] using the currently
    /// selected options, then recompute the row id.
    pub fn update_from_buyable(&mut self, product: &dyn Buyable, generator: &dyn RowIdGenerator) {
        self.id = product.identifier(&self.options);
        self.name = product.description(&self.options);
        self.price = product.price(&self.options);
        self.row_id = generator.row_id(&self.id, &self.options);
    }

    /// Apply a partial field patch, then recompute the row id from the
    /// possibly changed identity inputs.
    pub fn apply(&mut self, fields: ItemFields, generator: &dyn RowIdGenerator) -> Result<(), CartError> {
        if let Some(id) = fields.id {
            if id.is_empty() {
                return Err(CartError::InvalidItem(
                    "please supply a valid identifier".to_string(),
                ));
            }
            self.id = id;
        }
        if let Some(name) = fields.name {
            if name.is_empty() {
                return Err(CartError::InvalidItem(
                    "please supply a valid name".to_string(),
                ));
            }
            self.name = name;
        }
        if let Some(price) = fields.price {
            if !price.is_finite() || price < 0.0 {
                return Err(CartError::InvalidItem(format!(
                    "please supply a valid price, got {price}"
                )));
            }
            self.price = price;
        }
        if let Some(qty) = fields.qty {
            self.qty = qty;
        }
        if let Some(options) = fields.options {
            self.options.merge(options);
        }
        self.row_id = generator.row_id(&self.id, &self.options);
        Ok(())
    }

    /// The external (display/export) representation, with tax and subtotal
    /// derived at serialization time.
    pub fn to_record(&self) -> CartItemRecord {
        CartItemRecord {
            row_id: self.row_id.clone(),
            id: self.id.clone(),
            name: self.name.clone(),
            qty: self.qty,
            price: self.price,
            options: self.options.clone(),
            tax: self.tax(),
            subtotal: self.subtotal(),
        }
    }

    /// Rebuild an item from its external representation. The recorded row
    /// id is kept; the tax rate is re-derived from the recorded per-unit
    /// tax amount.
    pub fn from_record(record: CartItemRecord) -> Self {
        let tax_rate = if record.price > 0.0 {
            100.0 * record.tax / record.price
        } else {
            0.0
        };
        Self {
            row_id: record.row_id,
            id: record.id,
            name: record.name,
            qty: record.qty,
            price: record.price,
            options: record.options,
            tax_rate,
        }
    }

    /// JSON form of the external representation.
    pub fn to_json(&self) -> Result<String, CartError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }
}

/// External (display/export) representation of a cart item.
///
/// Field order is part of the contract: `rowId, id, name, qty, price,
/// options, tax, subtotal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    pub row_id: String,
    pub id: ItemId,
    pub name: String,
    pub qty: f64,
    pub price: f64,
    pub options: CartItemOptions,
    /// Per-unit tax amount at serialization time.
    pub tax: f64,
    /// Row subtotal at serialization time.
    pub subtotal: f64,
}
