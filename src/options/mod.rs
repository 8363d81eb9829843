//! Server-wide options for an SMTP listener.
//!
//! [`ServerOptionsBuilder`] is the only way to change a [`ServerOptions`].
//! Once built, the options are shared behind an `Arc` and every consumer,
//! whether it is a listener, a session or a filter pipeline, sees the read-only
//! accessors and nothing else.
//!
//! While the builder is alive, [`ServerOptionsBuilder::options`] hands out a
//! view onto the very store being built, so reads always reflect every
//! mutation made before them.

mod builder;

use std::{fmt, net::SocketAddr, sync::Arc};

pub use self::builder::ServerOptionsBuilder;
use crate::{
    auth::UserAuthenticator,
    filter::{EffectiveFilterFactory, MailboxFilterFactory},
    store::MessageStoreFactory,
    tls::ServerCertificate,
};

/// The read-only contract handed to everything that consumes server options.
pub trait SmtpServerOptions: Send + Sync {
    /// Maximum accepted message size in bytes, 0 for no limit.
    fn max_message_size(&self) -> usize;

    /// Name announced in the greeting banner.
    fn server_name(&self) -> &str;

    fn server_certificate(&self) -> Option<&Arc<ServerCertificate>>;

    /// Bind targets, in bind order.
    fn endpoints(&self) -> &[SocketAddr];

    fn message_store_factory(&self) -> Option<&Arc<dyn MessageStoreFactory>>;

    /// Every registered mailbox filter factory, in registration order.
    fn mailbox_filter_factories(&self) -> &[Arc<dyn MailboxFilterFactory>];

    /// The factory a session should use for mailbox filtering.
    fn mailbox_filter_factory(&self) -> EffectiveFilterFactory;

    fn user_authenticator(&self) -> Option<&Arc<dyn UserAuthenticator>>;

    /// Whether `AUTH` is permitted before the session is secure.
    fn allow_unsecure_authentication(&self) -> bool;

    /// Whether sessions may upgrade via STARTTLS.
    fn supports_tls(&self) -> bool {
        self.server_certificate().is_some()
    }

    /// Whether sessions may authenticate at all.
    fn supports_authentication(&self) -> bool {
        self.user_authenticator().is_some()
    }
}

/// The options store. Only [`ServerOptionsBuilder`] can change it.
///
/// Frozen options are read-only. Slices handed out cannot grow:
///
/// ```compile_fail
/// let options = courier::ServerOptions::builder().build();
/// options.endpoints().push("0.0.0.0:25".parse().unwrap());
/// ```
///
/// Builder mutators do not exist on the frozen store:
///
/// ```compile_fail
/// let options = courier::ServerOptions::builder().build();
/// options.set_max_message_size(1024);
/// ```
///
/// And fields are private, even on an owned store:
///
/// ```compile_fail
/// let mut options = courier::ServerOptions::default();
/// options.endpoints = Vec::new();
/// ```
#[derive(Default)]
pub struct ServerOptions {
    max_message_size: usize,
    server_name: String,
    server_certificate: Option<Arc<ServerCertificate>>,
    endpoints: Vec<SocketAddr>,
    mailbox_filter_factories: Vec<Arc<dyn MailboxFilterFactory>>,
    message_store_factory: Option<Arc<dyn MessageStoreFactory>>,
    user_authenticator: Option<Arc<dyn UserAuthenticator>>,
    allow_unsecure_authentication: bool,
}

impl ServerOptions {
    pub fn builder() -> ServerOptionsBuilder {
        ServerOptionsBuilder::default()
    }

    pub const fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub const fn server_certificate(&self) -> Option<&Arc<ServerCertificate>> {
        self.server_certificate.as_ref()
    }

    pub fn endpoints(&self) -> &[SocketAddr] {
        &self.endpoints
    }

    /// Every registered mailbox filter factory, in registration order.
    pub fn mailbox_filter_factories(&self) -> &[Arc<dyn MailboxFilterFactory>] {
        &self.mailbox_filter_factories
    }

    pub const fn message_store_factory(&self) -> Option<&Arc<dyn MessageStoreFactory>> {
        self.message_store_factory.as_ref()
    }

    /// Collapse the registered filter factories into the one a session uses.
    ///
    /// A single registration is returned as-is. Anything else, including no
    /// registrations at all, is wrapped in a composite. This is recomputed on
    /// every call.
    pub fn mailbox_filter_factory(&self) -> EffectiveFilterFactory {
        EffectiveFilterFactory::select(&self.mailbox_filter_factories)
    }

    pub const fn user_authenticator(&self) -> Option<&Arc<dyn UserAuthenticator>> {
        self.user_authenticator.as_ref()
    }

    pub const fn allow_unsecure_authentication(&self) -> bool {
        self.allow_unsecure_authentication
    }

    /// Whether sessions may upgrade via STARTTLS.
    pub const fn supports_tls(&self) -> bool {
        self.server_certificate.is_some()
    }

    /// Whether sessions may authenticate at all.
    pub const fn supports_authentication(&self) -> bool {
        self.user_authenticator.is_some()
    }
}

impl SmtpServerOptions for ServerOptions {
    fn max_message_size(&self) -> usize {
        Self::max_message_size(self)
    }

    fn server_name(&self) -> &str {
        Self::server_name(self)
    }

    fn server_certificate(&self) -> Option<&Arc<ServerCertificate>> {
        Self::server_certificate(self)
    }

    fn endpoints(&self) -> &[SocketAddr] {
        Self::endpoints(self)
    }

    fn message_store_factory(&self) -> Option<&Arc<dyn MessageStoreFactory>> {
        Self::message_store_factory(self)
    }

    fn mailbox_filter_factories(&self) -> &[Arc<dyn MailboxFilterFactory>] {
        Self::mailbox_filter_factories(self)
    }

    fn mailbox_filter_factory(&self) -> EffectiveFilterFactory {
        Self::mailbox_filter_factory(self)
    }

    fn user_authenticator(&self) -> Option<&Arc<dyn UserAuthenticator>> {
        Self::user_authenticator(self)
    }

    fn allow_unsecure_authentication(&self) -> bool {
        Self::allow_unsecure_authentication(self)
    }

    fn supports_tls(&self) -> bool {
        Self::supports_tls(self)
    }

    fn supports_authentication(&self) -> bool {
        Self::supports_authentication(self)
    }
}

impl fmt::Debug for ServerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerOptions")
            .field("max_message_size", &self.max_message_size)
            .field("server_name", &self.server_name)
            .field("tls", &self.supports_tls())
            .field("endpoints", &self.endpoints)
            .field("mailbox_filter_factories", &self.mailbox_filter_factories)
            .field("message_store_factory", &self.message_store_factory)
            .field("user_authenticator", &self.user_authenticator)
            .field(
                "allow_unsecure_authentication",
                &self.allow_unsecure_authentication,
            )
            .finish()
    }
}
