use std::fmt::Debug;

use async_trait::async_trait;

use crate::{mailbox::Mailbox, session::SessionContext};

/// The envelope and content of a message handed to a [`MessageStore`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    pub from: Mailbox,
    pub to: Vec<Mailbox>,
    pub data: Vec<u8>,
}

/// Persists messages accepted during a session.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Save a message
    ///
    /// # Errors
    /// If the message cannot be persisted; the session reports a transient
    /// failure to the client.
    async fn save(&self, ctx: &SessionContext, transaction: &Transaction) -> anyhow::Result<()>;
}

/// Produces a [`MessageStore`] for each new session.
pub trait MessageStoreFactory: Send + Sync + Debug {
    fn create_instance(&self, ctx: &SessionContext) -> Box<dyn MessageStore>;
}
