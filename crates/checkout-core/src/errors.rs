use checkout_client::ClientError;
use thiserror::Error;

/// Outcome taxonomy for checkout operations. Every variant is a reported
/// outcome, not an escaped exception: validation failures are raised
/// before any network call, transport failures carry backend detail when
/// present, and a failed finalize after a successful external payment is
/// its own category because retrying it would double-charge.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Transport(String),

    #[error("invalid payment data: {0}")]
    InvalidCallback(String),

    /// Split brain: the external payment completed but order creation
    /// failed. The user must contact support rather than pay again.
    #[error("payment succeeded but order creation failed; contact support: {0}")]
    OrderNotFinalized(String),
}

impl From<ClientError> for CheckoutError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { message, .. } => CheckoutError::Transport(message),
            other => CheckoutError::Transport(other.to_string()),
        }
    }
}

impl CheckoutError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CheckoutError::Validation(_) | CheckoutError::NotAuthenticated
        )
    }
}
