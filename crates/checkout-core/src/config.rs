use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the storefront backend, trailing slash included.
    pub api_url: String,
    /// Form-post endpoint of the external payment processor.
    pub gateway_url: String,
    /// Return routes the processor redirects back to.
    pub success_url: String,
    pub failure_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("CHECKOUT_API_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api/v1/".into());
        let gateway_url = env::var("CHECKOUT_GATEWAY_URL")
            .unwrap_or_else(|_| "https://rc-epay.esewa.com.np/api/epay/main/v2/form".into());
        let success_url = env::var("CHECKOUT_SUCCESS_URL")
            .unwrap_or_else(|_| "http://localhost:3000/payment-success".into());
        let failure_url = env::var("CHECKOUT_FAILURE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/payment-failure".into());
        Ok(Self {
            api_url,
            gateway_url,
            success_url,
            failure_url,
        })
    }
}
