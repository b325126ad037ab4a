//! checkout-core: client-side orchestration of cart state, order
//! submission, and the payment-gateway redirect/callback protocol.

pub mod config;
pub mod errors;

pub mod application;

pub use checkout_types::{domain, ports};
