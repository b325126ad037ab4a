//! checkout-client: typed HTTP client for the storefront backend.
//!
//! One method per backend endpoint, no orchestration. Consistency rules
//! (re-fetch after mutation, validation gates, the payment state machine)
//! live in `checkout-core`; this crate only speaks the wire contract.

use std::time::Duration;

use anyhow::Context;
use checkout_types::domain::cart::Cart;
use checkout_types::domain::order::{DeliveryDetails, Order, OrderItemRef, PaymentProof};
use checkout_types::domain::payment::PaymentIntent;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Non-success status. `message` is the backend's `{"message": ...}`
    /// body when one was sent, else the raw body or a generic fallback.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Clone)]
pub struct StorefrontClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct StorefrontClient {
    base: Url,
    client: reqwest::Client,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemRef>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentRequest {
    pub amount: f64,
    pub drop_location: String,
    pub landmark: String,
    pub receiver_contact: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub transaction_uuid: String,
    pub total_amount: String,
    pub product_code: String,
    pub signature: String,
    pub drop_location: String,
    pub landmark: String,
    pub receiver_contact: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl StorefrontClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<StorefrontClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(StorefrontClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// `GET cart/user/{user_id}` — the authoritative cart. The backend
    /// creates one lazily on first access.
    pub async fn fetch_cart(&self, token: &str, user_id: i64) -> Result<Cart, ClientError> {
        let res = self
            .client
            .get(self.url(&format!("cart/user/{user_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    /// `GET cart/totalPrice/{cart_id}` — backend-computed total.
    pub async fn fetch_total_price(&self, token: &str, cart_id: i64) -> Result<f64, ClientError> {
        let res = self
            .client
            .get(self.url(&format!("cart/totalPrice/{cart_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn add_item(
        &self,
        token: &str,
        product_id: i64,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.url("cartItem/add")?)
            .query(&[
                ("productId", product_id.to_string()),
                ("quantity", quantity.to_string()),
            ])
            .bearer_auth(token)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    pub async fn update_item(
        &self,
        token: &str,
        cart_id: i64,
        item_id: i64,
        quantity: u32,
    ) -> Result<(), ClientError> {
        let res = self
            .client
            .put(self.url(&format!("cartItem/cart/{cart_id}/item/{item_id}/update"))?)
            .query(&[("quantity", quantity.to_string())])
            .bearer_auth(token)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    pub async fn remove_item(
        &self,
        token: &str,
        cart_id: i64,
        item_id: i64,
    ) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url(&format!("cartItem/cart/{cart_id}/item/{item_id}/remove"))?)
            .bearer_auth(token)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// `DELETE cart/clear/{cart_id}` — bulk clear, where the backend
    /// supports it. Callers without this endpoint remove items one by one.
    pub async fn clear_cart(&self, token: &str, cart_id: i64) -> Result<(), ClientError> {
        let res = self
            .client
            .delete(self.url(&format!("cart/clear/{cart_id}"))?)
            .bearer_auth(token)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// Simple order: one JSON request carrying the cart's item refs.
    pub async fn place_order(&self, token: &str, items: &[OrderItemRef]) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.url("orders/order")?)
            .bearer_auth(token)
            .json(&PlaceOrderRequest {
                items: items.to_vec(),
            })
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// Detailed order: multipart with scalar delivery fields, the
    /// payment-proof file, and index-qualified item fields in cart order.
    pub async fn place_detailed_order(
        &self,
        token: &str,
        delivery: &DeliveryDetails,
        proof: &PaymentProof,
        items: &[OrderItemRef],
    ) -> Result<(), ClientError> {
        let screenshot = reqwest::multipart::Part::bytes(proof.bytes.clone())
            .file_name(proof.file_name.clone())
            .mime_str(&proof.content_type)?;
        let mut form = reqwest::multipart::Form::new()
            .text("dropLocation", delivery.drop_location.clone())
            .text("landmark", delivery.landmark.clone())
            .text("contactNumber", delivery.contact_number.clone())
            .part("paymentScreenshot", screenshot);
        for (index, item) in items.iter().enumerate() {
            form = form
                .text(format!("items[{index}].productId"), item.product_id.to_string())
                .text(format!("items[{index}].quantity"), item.quantity.to_string());
        }

        let res = self
            .client
            .post(self.url("orders/order")?)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// Request a fresh, single-use payment intent for `amount`.
    pub async fn request_payment_intent(
        &self,
        token: &str,
        amount: f64,
        delivery: &DeliveryDetails,
    ) -> Result<PaymentIntent, ClientError> {
        let res = self
            .client
            .post(self.url("orders/pay")?)
            .bearer_auth(token)
            .json(&PaymentIntentRequest {
                amount,
                drop_location: delivery.drop_location.clone(),
                landmark: delivery.landmark.clone(),
                receiver_contact: delivery.contact_number.clone(),
            })
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }

    /// Convert a completed external payment into a committed order.
    pub async fn finalize_payment(
        &self,
        token: &str,
        request: &FinalizeRequest,
    ) -> Result<(), ClientError> {
        let res = self
            .client
            .post(self.url("orders/payment-success")?)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        check(res).await?;
        Ok(())
    }

    /// `GET orders/my-orders` — the caller's committed orders.
    pub async fn list_my_orders(&self, token: &str) -> Result<Vec<Order>, ClientError> {
        let res = self
            .client
            .get(self.url("orders/my-orders")?)
            .bearer_auth(token)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }
}

/// Map non-success responses to `ClientError::Api`, preserving the
/// backend's `message` body when it sent one.
async fn check(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) if !body.trim().is_empty() => body,
        Err(_) => format!("request failed with status {status}"),
    };
    tracing::debug!(%status, message, "backend request failed");
    Err(ClientError::Api { status, message })
}

impl StorefrontClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<StorefrontClient> {
        if let Some(client) = self.client {
            return Ok(StorefrontClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(StorefrontClient {
            base: self.base,
            client,
        })
    }
}
