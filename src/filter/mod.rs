//! Mailbox filtering policies.
//!
//! A [`MailboxFilterFactory`] is registered with the server options and asked
//! for a fresh [`MailboxFilter`] at the start of every session. The filter then
//! decides whether the sender (`MAIL FROM`) and each recipient (`RCPT TO`) are
//! acceptable.

mod composite;

use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

use async_trait::async_trait;

pub use self::composite::{CompositeMailboxFilter, CompositeMailboxFilterFactory};
use crate::{mailbox::Mailbox, session::SessionContext};

/// The outcome of a single filter decision.
///
/// Variants are ordered by severity, so combining several results is a
/// matter of taking the maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterResult {
    /// The mailbox is acceptable.
    #[default]
    Accept,
    /// The mailbox cannot be accepted right now (4xx).
    Defer,
    /// The mailbox is permanently rejected (5xx).
    Reject,
    /// The declared message size is too large for this mailbox (552).
    SizeLimitExceeded,
}

impl FilterResult {
    pub const fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }

    /// Combine two decisions, keeping the most severe.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.max(other)
    }
}

impl Display for FilterResult {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            Self::Accept => "accept",
            Self::Defer => "defer",
            Self::Reject => "reject",
            Self::SizeLimitExceeded => "size limit exceeded",
        })
    }
}

/// A per-session mailbox policy.
///
/// Both decisions default to [`FilterResult::Accept`], so an implementation
/// only needs to override the side it cares about.
#[async_trait]
pub trait MailboxFilter: Send + Sync {
    /// Decide whether mail from `from`, declaring `size` bytes, may be accepted.
    ///
    /// A `size` of 0 means the client did not declare one.
    async fn can_accept_from(
        &self,
        _ctx: &SessionContext,
        _from: &Mailbox,
        _size: usize,
    ) -> FilterResult {
        FilterResult::Accept
    }

    /// Decide whether mail from `from` may be delivered to `to`.
    async fn can_deliver_to(
        &self,
        _ctx: &SessionContext,
        _to: &Mailbox,
        _from: &Mailbox,
    ) -> FilterResult {
        FilterResult::Accept
    }
}

/// Produces a [`MailboxFilter`] for each new session.
pub trait MailboxFilterFactory: Send + Sync + Debug {
    fn create_instance(&self, ctx: &SessionContext) -> Box<dyn MailboxFilter>;
}

/// The single factory a session should use, as selected from the registered
/// factories.
///
/// When exactly one factory was registered it is handed back untouched,
/// otherwise every registered factory sits behind a composite.
#[derive(Clone, Debug)]
pub enum EffectiveFilterFactory {
    Single(Arc<dyn MailboxFilterFactory>),
    Composite(CompositeMailboxFilterFactory),
}

impl EffectiveFilterFactory {
    /// Select the effective factory for the given registration sequence.
    pub fn select(factories: &[Arc<dyn MailboxFilterFactory>]) -> Self {
        match factories {
            [single] => Self::Single(Arc::clone(single)),
            _ => Self::Composite(CompositeMailboxFilterFactory::new(factories.to_vec())),
        }
    }

    /// The factories that will be consulted, in order.
    pub fn members(&self) -> &[Arc<dyn MailboxFilterFactory>] {
        match self {
            Self::Single(factory) => std::slice::from_ref(factory),
            Self::Composite(composite) => composite.factories(),
        }
    }
}

impl MailboxFilterFactory for EffectiveFilterFactory {
    fn create_instance(&self, ctx: &SessionContext) -> Box<dyn MailboxFilter> {
        match self {
            Self::Single(factory) => factory.create_instance(ctx),
            Self::Composite(composite) => composite.create_instance(ctx),
        }
    }
}
