//! Cart state and its transitions.
//!
//! [`CartState`] is plain data: every operation is total, synchronous and
//! free of storage concerns. Persistence is layered on top by
//! [`PersistentCart`](super::PersistentCart).

use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::command::CartCommand;
use super::item::{CartLineItem, LineItemDescriptor};
use crate::types::ProductId;

/// Items the shopper intends to purchase plus cart panel visibility.
///
/// Invariants:
/// - at most one line item per product id
/// - every stored quantity is at least 1
///
/// Items keep insertion order for display. The visibility flag is
/// independent of the items: adding never opens, clearing never closes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default, with = "items_by_id")]
    items: Vec<CartLineItem>,
    #[serde(default)]
    is_open: bool,
}

impl CartState {
    /// An empty, closed cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
        }
    }

    /// Apply one command.
    pub fn apply(&mut self, command: CartCommand) {
        match command {
            CartCommand::AddItem(candidate) => self.add_item(candidate),
            CartCommand::RemoveItem(id) => self.remove_item(&id),
            CartCommand::UpdateQuantity { id, quantity } => self.update_quantity(&id, quantity),
            CartCommand::Clear => self.clear(),
            CartCommand::Open => self.open(),
            CartCommand::Close => self.close(),
        }
    }

    /// Add one unit of a product.
    ///
    /// An existing line keeps all of its recorded fields and gains one unit;
    /// the candidate's other fields are discarded. A new product is appended
    /// with quantity 1.
    pub fn add_item(&mut self, candidate: LineItemDescriptor) {
        if let Some(existing) = self.find_mut(&candidate.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return;
        }
        self.items.push(CartLineItem::new(candidate, NonZeroU32::MIN));
    }

    /// Remove a product's line. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.id != id);
    }

    /// Set a line's quantity exactly.
    ///
    /// Zero or negative removes the line. Unknown ids are ignored. Values
    /// above `u32::MAX` saturate.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        let clamped = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        match NonZeroU32::new(clamped) {
            None => self.remove_item(id),
            Some(quantity) => {
                if let Some(item) = self.find_mut(id) {
                    item.quantity = quantity;
                }
            }
        }
    }

    /// Remove every line. Visibility is unchanged.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Show the cart panel.
    pub const fn open(&mut self) {
        self.is_open = true;
    }

    /// Hide the cart panel.
    pub const fn close(&mut self) {
        self.is_open = false;
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of `price * quantity` using the prices recorded at add time.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |total, item| {
            total.saturating_add(item.line_total())
        })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn item(&self, id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

/// Items are persisted as a JSON object keyed by product id.
///
/// Insertion order is kept on both sides. A key that disagrees with its
/// item's id, or a repeated id, rejects the whole map.
mod items_by_id {
    use std::fmt;

    use serde::de::{self, MapAccess, Visitor};
    use serde::{Deserializer, Serializer};

    use crate::cart::item::CartLineItem;

    #[allow(clippy::ptr_arg)] // signature fixed by `#[serde(with)]`
    pub fn serialize<S: Serializer>(
        items: &Vec<CartLineItem>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(items.iter().map(|item| (item.id.as_str(), item)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<CartLineItem>, D::Error> {
        deserializer.deserialize_map(ItemsVisitor)
    }

    struct ItemsVisitor;

    impl<'de> Visitor<'de> for ItemsVisitor {
        type Value = Vec<CartLineItem>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of product id to cart line item")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut items: Vec<CartLineItem> = Vec::with_capacity(map.size_hint().unwrap_or(0));

            while let Some((key, item)) = map.next_entry::<String, CartLineItem>()? {
                if key != item.id.as_str() {
                    return Err(de::Error::custom(format!(
                        "key {key:?} does not match item id {:?}",
                        item.id.as_str()
                    )));
                }
                if items.iter().any(|existing| existing.id == item.id) {
                    return Err(de::Error::custom(format!("duplicate item id {key:?}")));
                }
                items.push(item);
            }

            Ok(items)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: &str, price: &str) -> LineItemDescriptor {
        LineItemDescriptor {
            id: ProductId::from(id),
            name: format!("Product {id}"),
            price: dec(price),
            image: format!("/img/{id}.jpg"),
            category: "Compressors".to_string(),
            brand: Some("Atlas".to_string()),
            category_id: None,
            brand_id: None,
        }
    }

    fn quantity_of(cart: &CartState, id: &str) -> Option<u32> {
        cart.item(&ProductId::from(id)).map(|item| item.quantity.get())
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = CartState::new();
        assert!(cart.is_empty());
        assert!(!cart.is_open());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), Decimal::ZERO);
    }

    #[test]
    fn test_repeated_add_counts_calls_in_one_line() {
        let mut cart = CartState::new();
        for _ in 0..7 {
            cart.add_item(product("a", "10"));
        }
        assert_eq!(cart.items().len(), 1);
        assert_eq!(quantity_of(&cart, "a"), Some(7));
    }

    #[test]
    fn test_add_existing_discards_new_descriptor_fields() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "100"));

        let mut changed = product("a", "80");
        changed.name = "Renamed".to_string();
        changed.image = "/img/new.jpg".to_string();
        cart.add_item(changed);

        let item = cart.item(&ProductId::from("a")).unwrap();
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.name, "Product a");
        assert_eq!(item.image, "/img/a.jpg");
        assert_eq!(item.price, dec("100"));
    }

    #[test]
    fn test_numeric_and_string_ids_match() {
        let mut cart = CartState::new();
        let mut numeric = product("0", "5");
        numeric.id = ProductId::from(12_i64);
        cart.add_item(numeric);
        cart.add_item(product("12", "5"));
        assert_eq!(quantity_of(&cart, "12"), Some(2));
    }

    #[test]
    fn test_adding_does_not_open_cart() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        assert!(!cart.is_open());
    }

    #[test]
    fn test_update_quantity_to_zero_or_negative_removes() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.add_item(product("b", "1"));

        cart.update_quantity(&ProductId::from("a"), 0);
        cart.update_quantity(&ProductId::from("b"), -1);

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_exact_value() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.add_item(product("a", "1"));
        cart.update_quantity(&ProductId::from("a"), 5);
        assert_eq!(quantity_of(&cart, "a"), Some(5));
    }

    #[test]
    fn test_update_quantity_saturates_huge_values() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.update_quantity(&ProductId::from("a"), i64::MAX);
        assert_eq!(quantity_of(&cart, "a"), Some(u32::MAX));
    }

    #[test]
    fn test_update_quantity_on_absent_id_is_noop() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        let before = cart.clone();
        cart.update_quantity(&ProductId::from("zzz"), 3);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_absent_id_leaves_state_unchanged() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.open();
        let before = cart.clone();
        cart.remove_item(&ProductId::from("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_keeps_visibility() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.open();
        cart.clear();
        assert_eq!(cart.total_items(), 0);
        assert!(cart.items().is_empty());
        assert!(cart.is_open());
    }

    #[test]
    fn test_open_and_close_leave_items_alone() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "1"));
        cart.open();
        cart.close();
        assert!(!cart.is_open());
        assert_eq!(quantity_of(&cart, "a"), Some(1));
    }

    #[test]
    fn test_totals_match_sums() {
        let mut cart = CartState::new();
        cart.add_item(product("a", "19.99"));
        cart.add_item(product("b", "0.01"));
        cart.update_quantity(&ProductId::from("a"), 3);
        cart.update_quantity(&ProductId::from("b"), 4);

        assert_eq!(cart.total_items(), 7);
        assert_eq!(cart.total_price(), dec("60.01"));
    }

    #[test]
    fn test_two_product_scenario() {
        let mut cart = CartState::new();
        cart.add_item(product("A", "100"));
        cart.add_item(product("A", "100"));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(quantity_of(&cart, "A"), Some(2));
        assert_eq!(cart.total_price(), dec("200"));

        for _ in 0..3 {
            cart.add_item(product("B", "50"));
        }
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), dec("350"));

        cart.remove_item(&ProductId::from("A"));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), dec("150"));
    }

    #[test]
    fn test_apply_routes_commands() {
        let mut cart = CartState::new();
        cart.apply(CartCommand::AddItem(product("a", "2")));
        cart.apply(CartCommand::UpdateQuantity {
            id: ProductId::from("a"),
            quantity: 4,
        });
        cart.apply(CartCommand::Open);
        assert_eq!(cart.total_price(), dec("8"));
        assert!(cart.is_open());

        cart.apply(CartCommand::RemoveItem(ProductId::from("a")));
        cart.apply(CartCommand::Close);
        assert!(cart.is_empty());
        assert!(!cart.is_open());

        cart.apply(CartCommand::AddItem(product("b", "2")));
        cart.apply(CartCommand::Clear);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = CartState::new();
        for id in ["c", "a", "b"] {
            cart.add_item(product(id, "1"));
        }
        cart.add_item(product("a", "1"));
        let ids: Vec<&str> = cart.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }
}
