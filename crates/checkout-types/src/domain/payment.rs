use serde::{Deserialize, Serialize};

/// Field names covered by the gateway signature, in signature order.
pub const SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// Server-issued, single-use description of an amount to be paid through
/// the external processor. A retried payment needs a fresh intent; these
/// are never cached or replayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub amount: f64,
    pub total_amount: f64,
    pub transaction_id: String,
    pub product_code: String,
    pub signature: String,
}

/// Payload the processor hands back on the success route, base64-encoded
/// in a query parameter. Field names are the processor's, snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentCallback {
    pub transaction_uuid: String,
    pub total_amount: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub product_code: String,
    #[serde(default)]
    pub signature: String,
}

/// The outbound redirect to the payment processor. The field set and
/// names are a wire contract: renaming or omitting any of them breaks
/// signature verification on the processor side.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectForm {
    pub action: String,
    pub amount: String,
    pub tax_amount: String,
    pub total_amount: String,
    pub transaction_uuid: String,
    pub product_code: String,
    pub product_service_charge: String,
    pub product_delivery_charge: String,
    pub success_url: String,
    pub failure_url: String,
    pub signed_field_names: String,
    pub signature: String,
}

impl RedirectForm {
    pub fn new(
        intent: &PaymentIntent,
        action: &str,
        success_url: &str,
        failure_url: &str,
    ) -> Self {
        Self {
            action: action.to_owned(),
            amount: intent.amount.to_string(),
            tax_amount: "0".to_owned(),
            total_amount: format!("{:.2}", intent.total_amount),
            transaction_uuid: intent.transaction_id.clone(),
            product_code: intent.product_code.clone(),
            product_service_charge: "0".to_owned(),
            product_delivery_charge: "0".to_owned(),
            success_url: success_url.to_owned(),
            failure_url: failure_url.to_owned(),
            signed_field_names: SIGNED_FIELD_NAMES.to_owned(),
            signature: intent.signature.clone(),
        }
    }

    /// Form fields as ordered `(name, value)` pairs, ready to be rendered
    /// as hidden inputs and POSTed to [`RedirectForm::action`].
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("amount", self.amount.as_str()),
            ("tax_amount", self.tax_amount.as_str()),
            ("total_amount", self.total_amount.as_str()),
            ("transaction_uuid", self.transaction_uuid.as_str()),
            ("product_code", self.product_code.as_str()),
            ("product_service_charge", self.product_service_charge.as_str()),
            ("product_delivery_charge", self.product_delivery_charge.as_str()),
            ("success_url", self.success_url.as_str()),
            ("failure_url", self.failure_url.as_str()),
            ("signed_field_names", self.signed_field_names.as_str()),
            ("signature", self.signature.as_str()),
        ]
    }
}
