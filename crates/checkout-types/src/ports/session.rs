/// Capability supplying the bearer credential and the current principal.
/// Issuing and storing credentials is someone else's job; the checkout
/// core only consumes them, and short-circuits locally when absent.
pub trait SessionAccessor: Send + Sync + 'static {
    fn bearer_token(&self) -> Option<String>;
    fn principal_id(&self) -> Option<i64>;
}

/// Fixed-credential accessor for wiring demos and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
    principal_id: Option<i64>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>, principal_id: i64) -> Self {
        Self {
            token: Some(token.into()),
            principal_id: Some(principal_id),
        }
    }

    /// A session with no credential; every authenticated operation built
    /// on it fails locally without touching the network.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionAccessor for StaticSession {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn principal_id(&self) -> Option<i64> {
        self.principal_id
    }
}
