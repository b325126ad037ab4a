use std::sync::Arc;

use checkout_client::StorefrontClient;
use checkout_types::domain::cart::Cart;
use checkout_types::ports::session::SessionAccessor;

use super::require_token;
use crate::errors::CheckoutError;

/// How `clear_cart` talks to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearStrategy {
    /// Single bulk-clear endpoint call.
    Bulk,
    /// One remove call per item, awaited strictly one at a time. Two
    /// concurrent deletes can corrupt a shared item index on the backend.
    Sequential,
}

/// Owned view of the server-authoritative cart.
///
/// Every successful mutation is followed by an awaited re-fetch; the
/// store never extrapolates the post-mutation state locally, because the
/// backend may apply rules (stock limits, price changes) the client
/// cannot replicate. Mutations take `&mut self`, so one store instance
/// cannot issue overlapping cart operations.
pub struct CartStore {
    client: StorefrontClient,
    session: Arc<dyn SessionAccessor>,
    clear_strategy: ClearStrategy,
    cart: Option<Cart>,
    total_price: f64,
}

impl CartStore {
    pub fn new(
        client: StorefrontClient,
        session: Arc<dyn SessionAccessor>,
        clear_strategy: ClearStrategy,
    ) -> Self {
        Self {
            client,
            session,
            clear_strategy,
            cart: None,
            total_price: 0.0,
        }
    }

    /// Read-only view of the last successfully fetched cart.
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.as_ref().map_or(true, Cart::is_empty)
    }

    /// Backend-authoritative when the total endpoint answered, locally
    /// computed otherwise. Display value only, never written back.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Replace the local cart with the server's view. A failed fetch
    /// leaves the previously loaded cart untouched.
    pub async fn fetch_cart(&mut self) -> Result<(), CheckoutError> {
        let token = require_token(self.session.as_ref())?;
        let user_id = self
            .session
            .principal_id()
            .ok_or(CheckoutError::NotAuthenticated)?;
        let cart = self.client.fetch_cart(&token, user_id).await?;
        self.cart = Some(cart);
        self.refresh_total(&token).await;
        Ok(())
    }

    pub async fn add_item(&mut self, product_id: i64, quantity: u32) -> Result<(), CheckoutError> {
        if quantity < 1 {
            return Err(CheckoutError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        let token = require_token(self.session.as_ref())?;
        self.client.add_item(&token, product_id, quantity).await?;
        self.fetch_cart().await
    }

    /// No-op when no cart is loaded. A failed delete leaves the cart
    /// as-is and reports the error.
    pub async fn remove_item(&mut self, item_id: i64) -> Result<(), CheckoutError> {
        let Some(cart_id) = self.cart.as_ref().map(|c| c.id) else {
            tracing::warn!(item_id, "remove_item with no cart loaded");
            return Ok(());
        };
        let token = require_token(self.session.as_ref())?;
        self.client.remove_item(&token, cart_id, item_id).await?;
        self.fetch_cart().await
    }

    /// Quantities below 1 are rejected before any request goes out;
    /// decrementing to zero is a remove, not an update.
    pub async fn update_item(&mut self, item_id: i64, quantity: u32) -> Result<(), CheckoutError> {
        if quantity < 1 {
            return Err(CheckoutError::Validation(
                "quantity must be at least 1".into(),
            ));
        }
        let Some(cart_id) = self.cart.as_ref().map(|c| c.id) else {
            tracing::warn!(item_id, "update_item with no cart loaded");
            return Ok(());
        };
        let token = require_token(self.session.as_ref())?;
        self.client
            .update_item(&token, cart_id, item_id, quantity)
            .await?;
        self.fetch_cart().await
    }

    /// Empty the server-side cart, then re-fetch. With no bulk endpoint
    /// the removals run strictly sequentially, item *n+1* only after
    /// item *n* completed.
    pub async fn clear_cart(&mut self) -> Result<(), CheckoutError> {
        let Some(cart) = self.cart.clone() else {
            tracing::warn!("clear_cart with no cart loaded");
            return Ok(());
        };
        let token = require_token(self.session.as_ref())?;
        match self.clear_strategy {
            ClearStrategy::Bulk => {
                self.client.clear_cart(&token, cart.id).await?;
            }
            ClearStrategy::Sequential => {
                for item in &cart.items {
                    if let Err(err) = self.client.remove_item(&token, cart.id, item.id).await {
                        // Earlier removals already landed; re-sync so the
                        // local cart does not keep showing deleted items.
                        if let Err(fetch_err) = self.fetch_cart().await {
                            tracing::warn!(error = %fetch_err, "re-fetch after partial clear failed");
                        }
                        return Err(err.into());
                    }
                }
            }
        }
        self.fetch_cart().await
    }

    /// Drop the local items without a re-fetch. Only for flows where the
    /// server has already committed the order (payment finalize).
    pub fn clear_local(&mut self) {
        if let Some(cart) = self.cart.as_mut() {
            cart.items.clear();
        }
        self.total_price = 0.0;
    }

    /// Re-derive the total from current state. Prefers the backend's
    /// answer, falls back to the local sum when the endpoint fails.
    /// Idempotent and safe to run after every cart change.
    async fn refresh_total(&mut self, token: &str) {
        let Some(cart) = self.cart.as_ref() else {
            self.total_price = 0.0;
            return;
        };
        let local = cart.local_total();
        match self.client.fetch_total_price(token, cart.id).await {
            Ok(total) => self.total_price = total,
            Err(err) => {
                tracing::debug!(error = %err, "total endpoint unavailable, using local total");
                self.total_price = local;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_types::ports::session::StaticSession;
    use httpmock::prelude::*;

    fn store_for(server: &MockServer, strategy: ClearStrategy) -> CartStore {
        let client = StorefrontClient::new(&server.base_url()).unwrap();
        CartStore::new(client, Arc::new(StaticSession::new("tok", 1)), strategy)
    }

    #[tokio::test]
    async fn update_below_one_never_calls_the_network() {
        let server = MockServer::start();
        let update_mock = server.mock(|when, then| {
            when.method(PUT).path_contains("/cartItem/");
            then.status(200);
        });

        let mut store = store_for(&server, ClearStrategy::Bulk);
        let err = store.update_item(9, 0).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(update_mock.hits(), 0);
    }

    #[tokio::test]
    async fn mutations_without_a_cart_are_no_ops() {
        let server = MockServer::start();
        let any_mock = server.mock(|when, then| {
            when.path_contains("/");
            then.status(200);
        });

        let mut store = store_for(&server, ClearStrategy::Sequential);
        store.remove_item(9).await.unwrap();
        store.update_item(9, 2).await.unwrap();
        store.clear_cart().await.unwrap();
        assert_eq!(any_mock.hits(), 0);
    }

    #[tokio::test]
    async fn missing_credential_short_circuits_locally() {
        let server = MockServer::start();
        let any_mock = server.mock(|when, then| {
            when.path_contains("/");
            then.status(200);
        });

        let client = StorefrontClient::new(&server.base_url()).unwrap();
        let mut store = CartStore::new(
            client,
            Arc::new(StaticSession::anonymous()),
            ClearStrategy::Bulk,
        );
        let err = store.fetch_cart().await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotAuthenticated));
        let err = store.add_item(42, 1).await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotAuthenticated));
        assert_eq!(any_mock.hits(), 0);
    }
}
