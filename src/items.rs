//! Line Items

use crate::amounts::{Amount, sum};

/// A catalog line item quoted under a pricing policy.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<T> {
    name: String,
    sku: String,
    list_price: T,
    active: bool,
}

impl<T: Amount> LineItem<T> {
    /// Creates a new active line item.
    pub fn new(name: impl Into<String>, sku: impl Into<String>, list_price: T) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            list_price,
            active: true,
        }
    }

    /// Returns the same item with its active flag set.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Item name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stock keeping unit
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// List price before any discount
    pub fn list_price(&self) -> T {
        self.list_price
    }

    /// Whether the item counts towards the base total
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Include or exclude the item from the base total.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Sums the list prices of all active items.
///
/// Returns zero when no item is active, and clamps at the bounds of the
/// amount type rather than overflowing.
pub fn base_total<T: Amount>(items: &[LineItem<T>]) -> T {
    sum(items
        .iter()
        .filter(|item| item.is_active())
        .map(LineItem::list_price))
}
