//! The cart aggregate.
//!
//! A [`Cart`] is a stateless façade over an injected [`StoreManager`]: it
//! holds no item state of its own, re-reads the authoritative mapping from
//! the store before every operation and writes the full mapping back after
//! each mutation. The store owns the data; the cart owns the semantics.

use crate::buyable::Buyable;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::format::number_format;
use crate::item::{CartItem, CartItemOptions, ItemAttributes, ItemFields};
use crate::rowid::{DefaultRowId, RowIdGenerator};
use crate::store::{CartContent, StoreManager};
use tracing::debug;

/// Name of the instance a cart is bound to at construction.
pub const DEFAULT_INSTANCE: &str = "default";

/// A single item spec for batch adds: raw attributes or a buyable object
/// with its quantity and selected options.
pub enum ItemSpec<'a> {
    Attributes(ItemAttributes),
    Buyable {
        product: &'a dyn Buyable,
        qty: f64,
        options: CartItemOptions,
    },
}

impl<'a> From<ItemAttributes> for ItemSpec<'a> {
    fn from(attrs: ItemAttributes) -> Self {
        ItemSpec::Attributes(attrs)
    }
}

/// Patch applied by [`Cart::update`].
pub enum ItemUpdate<'a> {
    /// Replace the quantity in place; the row id is unaffected.
    Quantity(f64),
    /// Refresh id, name and price from the buyable, then recompute the
    /// row id.
    Buyable(&'a dyn Buyable),
    /// Apply field-by-field overrides, then recompute the row id.
    Fields(ItemFields),
}

/// A session shopping cart bound to one named instance of a store.
pub struct Cart {
    store: Box<dyn StoreManager>,
    config: CartConfig,
    instance: String,
    row_id_gen: Box<dyn RowIdGenerator>,
}

impl Cart {
    /// Create a cart over the given store, bound to the `"default"`
    /// instance.
    ///
    /// Fails with [`CartError::InvalidHandlerConfiguration`] when the
    /// configuration is inconsistent, or
    /// [`CartError::StoreInitialization`] when the store cannot prepare
    /// the instance partition.
    pub fn new(
        store: impl StoreManager + 'static,
        config: CartConfig,
    ) -> Result<Self, CartError> {
        config.validate()?;
        let mut cart = Self {
            store: Box::new(store),
            config,
            instance: String::new(),
            row_id_gen: Box::new(DefaultRowId),
        };
        cart.bind(DEFAULT_INSTANCE)?;
        Ok(cart)
    }

    /// Replace the row-id derivation strategy. The generator must be
    /// deterministic and pure; it applies to every later add and update.
    pub fn with_row_id_generator(mut self, generator: impl RowIdGenerator + 'static) -> Self {
        self.row_id_gen = Box::new(generator);
        self
    }

    /// Rebind the cart to the named instance, re-resolving the backing
    /// store partition. An empty name rebinds to `"default"`.
    pub fn instance(&mut self, name: &str) -> Result<&mut Self, CartError> {
        let name = if name.is_empty() { DEFAULT_INSTANCE } else { name };
        self.bind(name)?;
        Ok(self)
    }

    /// Name of the instance the cart is currently bound to.
    pub fn current_instance(&self) -> &str {
        &self.instance
    }

    fn bind(&mut self, name: &str) -> Result<(), CartError> {
        if !self.store.init(name)? {
            return Err(CartError::StoreInitialization(name.to_string()));
        }
        self.instance = name.to_string();
        Ok(())
    }

    /// Add an item from raw attributes. Returns the created row, or the
    /// merged pre-existing row when the computed row id already exists.
    pub fn add(&mut self, attrs: ItemAttributes) -> Result<CartItem, CartError> {
        let item = CartItem::from_attributes(attrs, self.config.tax, self.row_id_gen.as_ref())?;
        self.add_item(item)
    }

    /// Add a [`Buyable`] with the given quantity and selected options.
    pub fn add_buyable(
        &mut self,
        product: &dyn Buyable,
        qty: f64,
        options: CartItemOptions,
    ) -> Result<CartItem, CartError> {
        let mut item = CartItem::from_buyable(product, options, self.row_id_gen.as_ref())?;
        item.set_quantity(qty);
        item.set_tax_rate(self.config.tax);
        self.add_item(item)
    }

    /// Add a batch of item specs; results are collected in input order.
    pub fn add_many(&mut self, specs: Vec<ItemSpec<'_>>) -> Result<Vec<CartItem>, CartError> {
        specs
            .into_iter()
            .map(|spec| match spec {
                ItemSpec::Attributes(attrs) => self.add(attrs),
                ItemSpec::Buyable {
                    product,
                    qty,
                    options,
                } => self.add_buyable(product, qty, options),
            })
            .collect()
    }

    fn add_item(&mut self, item: CartItem) -> Result<CartItem, CartError> {
        let mut content = self.content()?;
        let result = match content.get_mut(&item.row_id) {
            // Identity wins over the latest payload: only the quantity of
            // the existing row changes.
            Some(existing) => {
                existing.set_quantity(existing.qty + item.qty);
                existing.clone()
            }
            None => {
                content.insert(item.row_id.clone(), item.clone());
                item
            }
        };
        debug!(row_id = %result.row_id, qty = result.qty, "cart item added");
        self.store.write(&content)?;
        Ok(result)
    }

    /// Update the row with the given id.
    ///
    /// Returns the updated item, or `None` when the resulting quantity was
    /// zero or negative and the row was removed. When the patch changes
    /// the identity inputs, the row migrates to its new row id — merging
    /// into a pre-existing row with that id if one exists.
    pub fn update(
        &mut self,
        row_id: &str,
        patch: ItemUpdate<'_>,
    ) -> Result<Option<CartItem>, CartError> {
        let mut item = self.get(row_id)?;
        match patch {
            ItemUpdate::Quantity(qty) => item.set_quantity(qty),
            ItemUpdate::Buyable(product) => {
                item.update_from_buyable(product, self.row_id_gen.as_ref())
            }
            ItemUpdate::Fields(fields) => item.apply(fields, self.row_id_gen.as_ref())?,
        }

        let mut content = self.content()?;
        if item.row_id != row_id {
            content.shift_remove(row_id);
            if let Some(existing) = content.get(&item.row_id) {
                item.set_quantity(existing.qty + item.qty);
            }
        }

        if item.qty <= 0.0 {
            content.shift_remove(&item.row_id);
            debug!(row_id = %item.row_id, "cart item removed");
            self.store.write(&content)?;
            return Ok(None);
        }

        content.insert(item.row_id.clone(), item.clone());
        debug!(row_id = %item.row_id, qty = item.qty, "cart item updated");
        self.store.write(&content)?;
        Ok(Some(item))
    }

    /// Remove the row with the given id.
    pub fn remove(&mut self, row_id: &str) -> Result<(), CartError> {
        let item = self.get(row_id)?;
        let mut content = self.content()?;
        content.shift_remove(&item.row_id);
        debug!(row_id = %item.row_id, "cart item removed");
        self.store.write(&content)
    }

    /// Get the row with the given id.
    pub fn get(&self, row_id: &str) -> Result<CartItem, CartError> {
        self.content()?
            .get(row_id)
            .cloned()
            .ok_or_else(|| CartError::InvalidRowId(row_id.to_string()))
    }

    /// Override the tax rate of the row with the given id.
    pub fn set_tax(&mut self, row_id: &str, tax_rate: f64) -> Result<(), CartError> {
        let mut content = self.content()?;
        let item = content
            .get_mut(row_id)
            .ok_or_else(|| CartError::InvalidRowId(row_id.to_string()))?;
        item.set_tax_rate(tax_rate);
        self.store.write(&content)
    }

    /// The full ordered mapping of the current instance, empty if none.
    pub fn content(&self) -> Result<CartContent, CartError> {
        if self.store.has() {
            self.store.read()
        } else {
            Ok(CartContent::new())
        }
    }

    /// Number of items in the cart: the sum of all row quantities.
    pub fn count(&self) -> Result<f64, CartError> {
        Ok(self.content()?.values().map(|item| item.qty).sum())
    }

    /// Total price of the cart content without tax.
    pub fn subtotal(&self) -> Result<f64, CartError> {
        Ok(self.content()?.values().map(CartItem::subtotal).sum())
    }

    /// Total tax of the cart content.
    pub fn tax(&self) -> Result<f64, CartError> {
        Ok(self.content()?.values().map(CartItem::tax_total).sum())
    }

    /// Total price of the cart content including tax.
    pub fn total(&self) -> Result<f64, CartError> {
        Ok(self.content()?.values().map(CartItem::total).sum())
    }

    /// Formatted [`subtotal`](Self::subtotal); `None` arguments fall back
    /// to the configured format defaults.
    pub fn subtotal_formatted(
        &self,
        decimals: Option<u32>,
        decimal_point: Option<&str>,
        thousand_sep: Option<&str>,
    ) -> Result<String, CartError> {
        let value = self.subtotal()?;
        Ok(self.format_value(value, decimals, decimal_point, thousand_sep))
    }

    /// Formatted [`tax`](Self::tax).
    pub fn tax_formatted(
        &self,
        decimals: Option<u32>,
        decimal_point: Option<&str>,
        thousand_sep: Option<&str>,
    ) -> Result<String, CartError> {
        let value = self.tax()?;
        Ok(self.format_value(value, decimals, decimal_point, thousand_sep))
    }

    /// Formatted [`total`](Self::total).
    pub fn total_formatted(
        &self,
        decimals: Option<u32>,
        decimal_point: Option<&str>,
        thousand_sep: Option<&str>,
    ) -> Result<String, CartError> {
        let value = self.total()?;
        Ok(self.format_value(value, decimals, decimal_point, thousand_sep))
    }

    /// Filter the cart content with a predicate over `(item, row_id)`,
    /// preserving the original order.
    pub fn search<F>(&self, predicate: F) -> Result<CartContent, CartError>
    where
        F: Fn(&CartItem, &str) -> bool,
    {
        Ok(self
            .content()?
            .into_iter()
            .filter(|(row_id, item)| predicate(item, row_id))
            .collect())
    }

    /// Clear all items of the current instance.
    pub fn destroy(&mut self) -> Result<(), CartError> {
        self.store.remove();
        debug!(instance = %self.instance, "cart destroyed");
        Ok(())
    }

    fn format_value(
        &self,
        value: f64,
        decimals: Option<u32>,
        decimal_point: Option<&str>,
        thousand_sep: Option<&str>,
    ) -> String {
        let format = &self.config.format;
        number_format(
            value,
            decimals.unwrap_or(format.decimals),
            decimal_point.unwrap_or(&format.decimal_point),
            thousand_sep.unwrap_or(&format.thousand_separator),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;
    use crate::store::MemoryStore;

    fn cart() -> Cart {
        let config = CartConfig {
            tax: 21.0,
            ..Default::default()
        };
        Cart::new(MemoryStore::new(), config).unwrap()
    }

    #[test]
    fn test_merge_on_add_keeps_existing_payload() {
        let mut cart = cart();
        cart.add(ItemAttributes::new(1, "Original name", 1.0, 10.0))
            .unwrap();
        let merged = cart
            .add(ItemAttributes::new(1, "Different name", 2.0, 99.0))
            .unwrap();

        assert_eq!(merged.qty, 3.0);
        assert_eq!(merged.name, "Original name");
        assert_eq!(merged.price, 10.0);
        assert_eq!(cart.content().unwrap().len(), 1);
    }

    #[test]
    fn test_update_migrates_row_to_new_identity() {
        let mut cart = cart();
        cart.add(
            ItemAttributes::new(1, "Item name", 1.0, 10.0)
                .with_options(CartItemOptions::from_iter([("color", "red")])),
        )
        .unwrap();

        let updated = cart
            .update(
                "ea65e0bdcd1967c4b3149e9e780177c0",
                ItemUpdate::Fields(
                    ItemFields::default()
                        .options(CartItemOptions::from_iter([("color", "blue")])),
                ),
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.row_id, "7e70a1e9aaadd18c72921a07aae5d011");
        let content = cart.content().unwrap();
        assert_eq!(content.len(), 1);
        assert!(content.contains_key("7e70a1e9aaadd18c72921a07aae5d011"));
    }

    #[test]
    fn test_update_with_changed_id_recomputes_row_id() {
        let mut cart = cart();
        cart.add(ItemAttributes::new(1, "Item name", 1.0, 10.0))
            .unwrap();

        let updated = cart
            .update(
                "027c91341fd5cf4d2579b49c4b6a90da",
                ItemUpdate::Fields(ItemFields::default().id(2)),
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, ItemId::Int(2));
        assert_eq!(updated.row_id, "370d08585360f5c568b18d1f2e4ca1df");
    }

    #[test]
    fn test_custom_row_id_generator() {
        let config = CartConfig::default();
        let mut cart = Cart::new(MemoryStore::new(), config)
            .unwrap()
            .with_row_id_generator(|id: &ItemId, options: &CartItemOptions| {
                format!("{id}/{}", options.len())
            });

        let item = cart
            .add(ItemAttributes::new(7, "Item name", 1.0, 10.0))
            .unwrap();
        assert_eq!(item.row_id, "7/0");
        assert!(cart.get("7/0").is_ok());
    }

    #[test]
    fn test_aggregates_sum_over_rows() {
        let mut cart = cart();
        cart.add(ItemAttributes::new(1, "First item", 1.0, 10.0))
            .unwrap();
        cart.add(ItemAttributes::new(2, "Second item", 2.0, 20.0))
            .unwrap();

        assert!((cart.subtotal().unwrap() - 50.0).abs() < 1e-9);
        assert!((cart.tax().unwrap() - 10.50).abs() < 1e-9);
        assert!((cart.total().unwrap() - 60.50).abs() < 1e-9);
        assert!(
            (cart.subtotal().unwrap() + cart.tax().unwrap() - cart.total().unwrap()).abs() < 1e-9
        );
    }

    #[test]
    fn test_formatted_aggregates_fall_back_to_config() {
        let mut cart = cart();
        cart.add(ItemAttributes::new(1, "First item", 1.0, 1000.0))
            .unwrap();
        cart.add(ItemAttributes::new(2, "Second item", 2.0, 2500.0))
            .unwrap();

        assert_eq!(
            cart.subtotal_formatted(Some(2), Some(","), Some(".")).unwrap(),
            "6.000,00"
        );
        // Config defaults: 2 decimals, '.' point, ',' separator.
        assert_eq!(cart.subtotal_formatted(None, None, None).unwrap(), "6,000.00");
    }
}
