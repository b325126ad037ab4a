use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use checkout_client::{FinalizeRequest, StorefrontClient};
use checkout_types::domain::order::DeliveryDetails;
use checkout_types::domain::payment::{PaymentCallback, RedirectForm};
use checkout_types::ports::session::SessionAccessor;

use super::cart_store::CartStore;
use super::require_token;
use crate::config::Config;
use crate::errors::CheckoutError;

/// Where a payment attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPhase {
    /// No payment requested yet.
    Idle,
    /// Intent requested from the backend.
    Started,
    /// Redirect form built and handed to the host; control is with the
    /// external processor until one of the return routes fires.
    Redirected,
    /// Return callback reconciled into a committed order, cart cleared.
    Finalized,
    /// The processor redirected to the failure route. No finalize ran and
    /// the cart was not touched.
    Failed,
}

/// Drives the redirect/callback protocol against the external payment
/// processor: STARTED → REDIRECTED → {FINALIZED | FAILED}.
pub struct PaymentBridge {
    client: StorefrontClient,
    session: Arc<dyn SessionAccessor>,
    gateway_url: String,
    success_url: String,
    failure_url: String,
    /// Delivery metadata captured at start, replayed into finalize.
    delivery: Option<DeliveryDetails>,
    phase: PaymentPhase,
}

impl PaymentBridge {
    pub fn new(client: StorefrontClient, session: Arc<dyn SessionAccessor>, config: &Config) -> Self {
        Self {
            client,
            session,
            gateway_url: config.gateway_url.clone(),
            success_url: config.success_url.clone(),
            failure_url: config.failure_url.clone(),
            delivery: None,
            phase: PaymentPhase::Idle,
        }
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// Request a payment intent for the current cart and build the
    /// redirect form the host must POST to the processor.
    ///
    /// Intents are single-use, so every call requests a fresh one; a user
    /// coming back via the browser history and paying again must never
    /// replay an old intent. The amount is the locally computed cart
    /// total; the backend signs the figures it is willing to accept.
    pub async fn start_payment(
        &mut self,
        store: &CartStore,
        delivery: DeliveryDetails,
    ) -> Result<RedirectForm, CheckoutError> {
        let amount = match store.cart() {
            Some(cart) if !cart.is_empty() => cart.local_total(),
            _ => {
                return Err(CheckoutError::Validation(
                    "Your cart is empty. Add items before paying.".into(),
                ))
            }
        };
        if amount <= 0.0 {
            return Err(CheckoutError::Validation(
                "cart total must be greater than zero".into(),
            ));
        }
        let token = require_token(self.session.as_ref())?;

        self.phase = PaymentPhase::Started;
        let intent = match self
            .client
            .request_payment_intent(&token, amount, &delivery)
            .await
        {
            Ok(intent) => intent,
            Err(err) => {
                // Nothing left the process; the attempt is over, not stuck.
                self.phase = PaymentPhase::Idle;
                return Err(err.into());
            }
        };
        self.delivery = Some(delivery);

        let form = RedirectForm::new(
            &intent,
            &self.gateway_url,
            &self.success_url,
            &self.failure_url,
        );
        self.phase = PaymentPhase::Redirected;
        tracing::debug!(
            transaction_uuid = %form.transaction_uuid,
            total_amount = %form.total_amount,
            "payment redirect prepared"
        );
        Ok(form)
    }

    /// Success-route return: decode the base64 payload, finalize the
    /// order server-side, clear the local cart.
    ///
    /// An undecodable payload is terminal for this flow and triggers no
    /// finalize call. A finalize failure is the split-brain case: the
    /// external payment went through, so the error instructs the user to
    /// contact support instead of paying again, and the cart is kept.
    pub async fn success_return(
        &mut self,
        store: &mut CartStore,
        data_param: &str,
    ) -> Result<PaymentCallback, CheckoutError> {
        let callback = decode_callback(data_param)?;
        let token = require_token(self.session.as_ref())?;
        let delivery = self.delivery.clone().unwrap_or_default();

        let request = FinalizeRequest {
            transaction_uuid: callback.transaction_uuid.clone(),
            total_amount: callback.total_amount.clone(),
            product_code: callback.product_code.clone(),
            signature: callback.signature.clone(),
            drop_location: delivery.drop_location,
            landmark: delivery.landmark,
            receiver_contact: delivery.contact_number,
        };
        match self.client.finalize_payment(&token, &request).await {
            Ok(()) => {
                // The server committed the order; emptying locally beats a
                // re-fetch that could race the backend's cart teardown.
                store.clear_local();
                self.phase = PaymentPhase::Finalized;
                Ok(callback)
            }
            Err(err) => Err(CheckoutError::OrderNotFinalized(err.to_string())),
        }
    }

    /// Failure-route return: no finalize, cart untouched.
    pub fn failure_return(&mut self) {
        self.phase = PaymentPhase::Failed;
    }
}

/// The processor appends `?data=<base64 JSON>` to the success route.
fn decode_callback(data_param: &str) -> Result<PaymentCallback, CheckoutError> {
    let bytes = STANDARD
        .decode(data_param.trim())
        .map_err(|e| CheckoutError::InvalidCallback(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| CheckoutError::InvalidCallback(e.to_string()))
}
