use std::{net::SocketAddr, sync::Arc};

use super::ServerOptions;
use crate::{
    auth::UserAuthenticator, filter::MailboxFilterFactory, internal, store::MessageStoreFactory,
    tls::ServerCertificate,
};

/// Accumulates [`ServerOptions`] during setup.
///
/// None of the setters validate their input. Passing `None` for an optional
/// capability simply disables it.
#[derive(Debug, Default)]
pub struct ServerOptionsBuilder {
    options: ServerOptions,
}

impl ServerOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A read-only view of the options as they stand right now.
    pub const fn options(&self) -> &ServerOptions {
        &self.options
    }

    pub const fn set_max_message_size(&mut self, max_message_size: usize) -> &mut Self {
        self.options.max_message_size = max_message_size;
        self
    }

    pub fn set_server_name(&mut self, server_name: impl Into<String>) -> &mut Self {
        self.options.server_name = server_name.into();
        self
    }

    pub fn set_server_certificate(
        &mut self,
        certificate: impl Into<Option<Arc<ServerCertificate>>>,
    ) -> &mut Self {
        self.options.server_certificate = certificate.into();
        self
    }

    /// Append a bind target. Duplicates are kept.
    pub fn add_endpoint(&mut self, endpoint: SocketAddr) -> &mut Self {
        self.options.endpoints.push(endpoint);
        self
    }

    /// Append a mailbox filter factory. Registration order is the order in
    /// which filters are consulted.
    pub fn add_mailbox_filter_factory(
        &mut self,
        factory: Arc<dyn MailboxFilterFactory>,
    ) -> &mut Self {
        self.options.mailbox_filter_factories.push(factory);
        self
    }

    pub fn set_message_store_factory(
        &mut self,
        factory: impl Into<Option<Arc<dyn MessageStoreFactory>>>,
    ) -> &mut Self {
        self.options.message_store_factory = factory.into();
        self
    }

    pub fn set_user_authenticator(
        &mut self,
        authenticator: impl Into<Option<Arc<dyn UserAuthenticator>>>,
    ) -> &mut Self {
        self.options.user_authenticator = authenticator.into();
        self
    }

    pub const fn set_allow_unsecure_authentication(&mut self, allow: bool) -> &mut Self {
        self.options.allow_unsecure_authentication = allow;
        self
    }

    /// Set the maximum message size in bytes, 0 for no limit
    #[must_use]
    pub const fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.set_max_message_size(max_message_size);
        self
    }

    /// Set the name announced in the greeting banner
    #[must_use]
    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.set_server_name(server_name);
        self
    }

    /// Set the certificate used for STARTTLS
    #[must_use]
    pub fn with_server_certificate(
        mut self,
        certificate: impl Into<Option<Arc<ServerCertificate>>>,
    ) -> Self {
        self.set_server_certificate(certificate);
        self
    }

    /// Append an endpoint to listen on
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: SocketAddr) -> Self {
        self.add_endpoint(endpoint);
        self
    }

    /// Append a mailbox filter factory
    #[must_use]
    pub fn with_mailbox_filter_factory(mut self, factory: Arc<dyn MailboxFilterFactory>) -> Self {
        self.add_mailbox_filter_factory(factory);
        self
    }

    /// Set the message store factory
    #[must_use]
    pub fn with_message_store_factory(
        mut self,
        factory: impl Into<Option<Arc<dyn MessageStoreFactory>>>,
    ) -> Self {
        self.set_message_store_factory(factory);
        self
    }

    /// Set the user authenticator
    #[must_use]
    pub fn with_user_authenticator(
        mut self,
        authenticator: impl Into<Option<Arc<dyn UserAuthenticator>>>,
    ) -> Self {
        self.set_user_authenticator(authenticator);
        self
    }

    /// Allow or forbid authentication on sessions without TLS
    #[must_use]
    pub const fn with_allow_unsecure_authentication(mut self, allow: bool) -> Self {
        self.set_allow_unsecure_authentication(allow);
        self
    }

    /// Freeze the options. The store moves into the `Arc` as-is.
    pub fn build(self) -> Arc<ServerOptions> {
        internal!(
            level = DEBUG,
            "Server options frozen: {} endpoint(s), {} mailbox filter factory(ies), tls = {}, auth = {}",
            self.options.endpoints.len(),
            self.options.mailbox_filter_factories.len(),
            self.options.supports_tls(),
            self.options.supports_authentication()
        );

        Arc::new(self.options)
    }
}
