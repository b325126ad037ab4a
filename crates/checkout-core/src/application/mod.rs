pub mod cart_store;
pub mod order_submitter;
pub mod payment_bridge;

use checkout_types::ports::session::SessionAccessor;

use crate::errors::CheckoutError;

/// Authenticated calls short-circuit locally when no credential is held,
/// instead of sending an unauthenticated request.
pub(crate) fn require_token(session: &dyn SessionAccessor) -> Result<String, CheckoutError> {
    session
        .bearer_token()
        .ok_or(CheckoutError::NotAuthenticated)
}
