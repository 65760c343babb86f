//! Cart store - single source of truth for the cart.
//!
//! One `CartStore` exists per running application, owned by `AppState` and
//! injected into every handler. Line items have no unique id: adding the
//! same product with the same selection twice yields two independent
//! entries, and removal takes out the first structural match.

use std::sync::{Mutex, MutexGuard, PoisonError};

use lojinha_core::{CurrencyCode, Price, ProductId};

/// One unit of a product with a fixed variant selection.
///
/// Product fields are copied by value at add-time; the selection fields are
/// fixed for the lifetime of the entry. `PartialEq` is the structural match
/// used by removal: product identity plus all three selection fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    /// Chosen color label.
    pub color: String,
    /// Chosen size label.
    pub size: String,
    /// Chosen variant image path.
    pub image: String,
}

/// Insertion-ordered cart state.
///
/// Handlers run concurrently, so the sequence sits behind a mutex; each
/// operation is a single lock acquisition, which keeps every mutation
/// atomic (no partial-completion window).
#[derive(Debug, Default)]
pub struct CartStore {
    items: Mutex<Vec<CartLineItem>>,
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means a handler panicked mid-read; the `Vec` is
    /// never left in a torn state, so recover the guard.
    fn lock(&self) -> MutexGuard<'_, Vec<CartLineItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item to the end of the sequence. Always succeeds.
    pub fn add(&self, item: CartLineItem) {
        self.lock().push(item);
    }

    /// Remove the first element structurally equal to `item`.
    ///
    /// Returns whether anything was removed. No match is not an error; the
    /// sequence is left unchanged.
    pub fn remove(&self, item: &CartLineItem) -> bool {
        let mut items = self.lock();
        match items.iter().position(|existing| existing == item) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the sequence with empty.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of line items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Sum of each line item's unit price. There is no quantity field;
    /// repeated entries are each priced individually.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount = self.lock().iter().map(|item| item.price.amount).sum();
        Price::new(amount, CurrencyCode::BRL)
    }

    /// Snapshot of the current sequence, insertion order preserved.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(product_id: i32, cents: i64, color: &str, size: &str) -> CartLineItem {
        CartLineItem {
            product_id: ProductId::new(product_id),
            name: format!("Produto {product_id}"),
            price: Price::from_cents(cents, CurrencyCode::BRL),
            color: color.to_string(),
            size: size.to_string(),
            image: format!("/static/produtos/{product_id}.png"),
        }
    }

    #[test]
    fn test_count_tracks_adds_and_removes() {
        let store = CartStore::new();
        assert_eq!(store.count(), 0);

        store.add(item(1, 15999, "Preto", "40"));
        store.add(item(2, 8999, "Azul", "M"));
        assert_eq!(store.count(), 2);

        assert!(store.remove(&item(1, 15999, "Preto", "40")));
        assert_eq!(store.count(), 1);

        store.clear();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_total_is_exact_sum_of_unit_prices() {
        let store = CartStore::new();
        assert_eq!(store.total().amount, Decimal::ZERO);

        store.add(item(1, 15999, "Preto", "40"));
        assert_eq!(store.total().amount, Decimal::new(15999, 2));

        store.add(item(2, 8999, "Azul", "M"));
        assert_eq!(store.total().amount, Decimal::new(24998, 2));
        assert_eq!(store.total().display(), "R$ 249.98");

        store.remove(&item(2, 8999, "Azul", "M"));
        assert_eq!(store.total().amount, Decimal::new(15999, 2));
    }

    #[test]
    fn test_duplicate_entries_are_independent_line_items() {
        let store = CartStore::new();
        store.add(item(1, 15999, "Preto", "40"));
        store.add(item(1, 15999, "Preto", "40"));
        assert_eq!(store.count(), 2);
        assert_eq!(store.total().amount, Decimal::new(31998, 2));

        // removing once takes out only the first match
        assert!(store.remove(&item(1, 15999, "Preto", "40")));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_without_match_is_a_noop() {
        let store = CartStore::new();
        store.add(item(1, 15999, "Preto", "40"));

        assert!(!store.remove(&item(2, 8999, "Azul", "M")));
        assert_eq!(store.count(), 1);
        assert_eq!(store.items(), vec![item(1, 15999, "Preto", "40")]);
    }

    #[test]
    fn test_remove_requires_all_selection_fields_to_match() {
        // same product and size, different color: structural match fails
        let store = CartStore::new();
        let mut added = item(2, 8999, "Vermelho", "M");
        added.image = "/static/produtos/camisasf1/ferrari.webp".to_string();
        store.add(added.clone());

        let mut wrong_color = added.clone();
        wrong_color.color = "Azul".to_string();
        assert!(!store.remove(&wrong_color));
        assert_eq!(store.count(), 1);

        assert!(store.remove(&added));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_clear_on_empty_cart_is_idempotent() {
        let store = CartStore::new();
        store.clear();
        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_items_preserves_insertion_order() {
        let store = CartStore::new();
        store.add(item(3, 3999, "Azul", "Único"));
        store.add(item(1, 15999, "Preto", "40"));
        store.add(item(2, 8999, "Azul", "M"));

        let ids: Vec<i32> = store
            .items()
            .iter()
            .map(|i| i.product_id.as_i32())
            .collect();
        assert_eq!(ids, [3, 1, 2]);
    }
}
