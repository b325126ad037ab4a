use serde::{Deserialize, Serialize};

/// Catalog snapshot referenced by a cart line. Owned by the catalog
/// subsystem; the checkout core never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: i64,
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Server-owned cart. The client treats the last successful fetch as the
/// only source of truth and never reconstructs state from stale data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: i64,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display fallback when no backend-computed total is available.
    /// Never written back to the server.
    pub fn local_total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, price: f64, quantity: u32) -> CartItem {
        CartItem {
            id,
            product: Product {
                id: id * 10,
                name: format!("P{id}"),
                price,
            },
            quantity,
        }
    }

    #[test]
    fn local_total_sums_price_times_quantity() {
        let cart = Cart {
            id: 1,
            items: vec![item(1, 100.0, 2), item(2, 50.0, 1)],
        };
        assert_eq!(cart.local_total(), 250.0);
    }

    #[test]
    fn empty_cart_totals_zero() {
        let cart = Cart { id: 1, items: vec![] };
        assert!(cart.is_empty());
        assert_eq!(cart.local_total(), 0.0);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{
            "id": 7,
            "items": [
                { "id": 3, "product": { "id": 11, "name": "Widget", "price": 19.5 }, "quantity": 2 }
            ]
        }"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.id, 7);
        assert_eq!(cart.items[0].product.name, "Widget");
        assert_eq!(cart.items[0].line_total(), 39.0);
    }
}
