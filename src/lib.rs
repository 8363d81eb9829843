pub mod auth;
pub mod config;
pub mod error;
pub mod extensions;
pub mod filter;
pub mod logging;
pub mod mailbox;
pub mod options;
pub mod session;
pub mod store;
pub mod tls;

pub use tracing;

pub use crate::{
    filter::{EffectiveFilterFactory, FilterResult, MailboxFilter, MailboxFilterFactory},
    options::{ServerOptions, ServerOptionsBuilder, SmtpServerOptions},
};
