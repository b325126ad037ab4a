use std::sync::Arc;

use checkout_client::StorefrontClient;
use checkout_types::domain::order::{DeliveryDetails, OrderItemRef, PaymentProof};
use checkout_types::ports::session::SessionAccessor;

use super::cart_store::CartStore;
use super::require_token;
use crate::errors::CheckoutError;

pub const ORDER_PLACED: &str = "Order placed successfully!";

/// Validates and submits an order from the current cart contents.
///
/// The in-flight flag is set before the network call and cleared on every
/// exit path; it is the sole guard against double submission, so it is
/// held for the entire async span including the post-success cart clear.
pub struct OrderSubmitter {
    client: StorefrontClient,
    session: Arc<dyn SessionAccessor>,
    in_flight: bool,
}

impl OrderSubmitter {
    pub fn new(client: StorefrontClient, session: Arc<dyn SessionAccessor>) -> Self {
        Self {
            client,
            session,
            in_flight: false,
        }
    }

    /// Callers disable their submit affordance while this is set.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Simple submission: one JSON request with the cart's item refs.
    pub async fn submit_simple(&mut self, store: &mut CartStore) -> Result<String, CheckoutError> {
        let items = self.ready_items(store)?;
        let token = require_token(self.session.as_ref())?;

        self.in_flight = true;
        let result = async {
            self.client.place_order(&token, &items).await?;
            Self::clear_after_success(store).await;
            Ok(ORDER_PLACED.to_owned())
        }
        .await;
        self.in_flight = false;
        result
    }

    /// Detailed submission: multipart with delivery fields, the
    /// payment-proof upload, and indexed item fields in cart order.
    pub async fn submit_detailed(
        &mut self,
        store: &mut CartStore,
        delivery: &DeliveryDetails,
        proof: &PaymentProof,
    ) -> Result<String, CheckoutError> {
        let items = self.ready_items(store)?;
        if !delivery.is_complete() || !proof.is_present() {
            return Err(CheckoutError::Validation(
                "All fields including payment screenshot are required.".into(),
            ));
        }
        let token = require_token(self.session.as_ref())?;

        self.in_flight = true;
        let result = async {
            self.client
                .place_detailed_order(&token, delivery, proof, &items)
                .await?;
            Self::clear_after_success(store).await;
            Ok(ORDER_PLACED.to_owned())
        }
        .await;
        self.in_flight = false;
        result
    }

    /// Validation gates shared by both modes, all before any network call.
    fn ready_items(&self, store: &CartStore) -> Result<Vec<OrderItemRef>, CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::Validation(
                "an order submission is already in progress".into(),
            ));
        }
        match store.cart() {
            Some(cart) if !cart.is_empty() => Ok(OrderItemRef::from_cart(cart)),
            _ => Err(CheckoutError::Validation(
                "Your cart is empty. Add items before placing an order.".into(),
            )),
        }
    }

    /// The order is committed at this point; a failed clear only leaves a
    /// stale local cart behind, so it is logged rather than propagated.
    async fn clear_after_success(store: &mut CartStore) {
        if let Err(err) = store.clear_cart().await {
            tracing::warn!(error = %err, "cart clear after successful order failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_types::ports::session::StaticSession;
    use httpmock::prelude::*;
    use std::sync::Arc;

    fn fixtures(server: &MockServer) -> (OrderSubmitter, CartStore) {
        let client = StorefrontClient::new(&server.base_url()).unwrap();
        let session: Arc<StaticSession> = Arc::new(StaticSession::new("tok", 1));
        (
            OrderSubmitter::new(client.clone(), session.clone()),
            CartStore::new(
                client,
                session,
                super::super::cart_store::ClearStrategy::Bulk,
            ),
        )
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_without_network() {
        let server = MockServer::start();
        let order_mock = server.mock(|when, then| {
            when.method(POST).path("/orders/order");
            then.status(201);
        });

        let (mut submitter, mut store) = fixtures(&server);
        let err = submitter.submit_simple(&mut store).await.unwrap_err();
        assert!(err.to_string().contains("cart is empty"));
        assert_eq!(order_mock.hits(), 0);
        assert!(!submitter.is_in_flight());
    }

    #[tokio::test]
    async fn missing_payment_proof_is_rejected_without_network() {
        let server = MockServer::start();
        let cart_mock = server.mock(|when, then| {
            when.method(GET).path("/cart/user/1");
            then.status(200).json_body(serde_json::json!({
                "id": 4,
                "items": [
                    { "id": 9, "product": { "id": 42, "name": "Widget", "price": 100.0 }, "quantity": 2 }
                ]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/cart/totalPrice/4");
            then.status(200).json_body(serde_json::json!(200.0));
        });
        let order_mock = server.mock(|when, then| {
            when.method(POST).path("/orders/order");
            then.status(201);
        });

        let (mut submitter, mut store) = fixtures(&server);
        store.fetch_cart().await.unwrap();
        cart_mock.assert();

        let delivery = DeliveryDetails {
            drop_location: "Hostel Gate".into(),
            landmark: "Clock Tower".into(),
            contact_number: "9800000000".into(),
        };
        let no_proof = PaymentProof {
            file_name: String::new(),
            content_type: "image/png".into(),
            bytes: vec![],
        };
        let err = submitter
            .submit_detailed(&mut store, &delivery, &no_proof)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("All fields"));
        assert_eq!(order_mock.hits(), 0);
    }

    #[tokio::test]
    async fn in_flight_guard_rejects_a_second_submission() {
        let server = MockServer::start();
        let order_mock = server.mock(|when, then| {
            when.method(POST).path("/orders/order");
            then.status(201);
        });

        let (mut submitter, mut store) = fixtures(&server);
        submitter.in_flight = true;
        let err = submitter.submit_simple(&mut store).await.unwrap_err();
        assert!(err.to_string().contains("already in progress"));
        assert_eq!(order_mock.hits(), 0);
    }
}
