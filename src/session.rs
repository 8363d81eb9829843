use std::net::SocketAddr;

/// Per-session facts handed to policy factories when a session starts, and to
/// the policies they produce on every decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    /// The remote client.
    pub peer: SocketAddr,
    /// The local endpoint the connection was accepted on.
    pub endpoint: SocketAddr,
    /// Whether the session has completed a TLS upgrade.
    pub secure: bool,
    /// Whether the client has successfully authenticated.
    pub authenticated: bool,
}

impl SessionContext {
    pub const fn new(peer: SocketAddr, endpoint: SocketAddr) -> Self {
        Self {
            peer,
            endpoint,
            secure: false,
            authenticated: false,
        }
    }

    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub const fn with_authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}
