use std::sync::Arc;

use async_trait::async_trait;

use super::{FilterResult, MailboxFilter, MailboxFilterFactory};
use crate::{mailbox::Mailbox, policy, session::SessionContext};

/// Fans out to every wrapped factory, in registration order.
///
/// An empty composite is valid and produces a filter that accepts everything.
#[derive(Clone, Debug, Default)]
pub struct CompositeMailboxFilterFactory {
    factories: Arc<[Arc<dyn MailboxFilterFactory>]>,
}

impl CompositeMailboxFilterFactory {
    pub fn new(factories: Vec<Arc<dyn MailboxFilterFactory>>) -> Self {
        Self {
            factories: factories.into(),
        }
    }

    pub fn factories(&self) -> &[Arc<dyn MailboxFilterFactory>] {
        &self.factories
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// One filter per wrapped factory, created in registration order.
    pub fn create_composite(&self, ctx: &SessionContext) -> CompositeMailboxFilter {
        policy!(
            "Creating composite mailbox filter over {} factories for {}",
            self.factories.len(),
            ctx.peer
        );

        CompositeMailboxFilter {
            filters: self
                .factories
                .iter()
                .map(|factory| factory.create_instance(ctx))
                .collect(),
        }
    }
}

impl MailboxFilterFactory for CompositeMailboxFilterFactory {
    fn create_instance(&self, ctx: &SessionContext) -> Box<dyn MailboxFilter> {
        Box::new(self.create_composite(ctx))
    }
}

/// A filter whose decision is the most severe decision of its members.
///
/// Every member is consulted exactly once per decision, in order, even after
/// one of them has rejected: members may record what they were asked.
pub struct CompositeMailboxFilter {
    filters: Vec<Box<dyn MailboxFilter>>,
}

impl CompositeMailboxFilter {
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[async_trait]
impl MailboxFilter for CompositeMailboxFilter {
    async fn can_accept_from(
        &self,
        ctx: &SessionContext,
        from: &Mailbox,
        size: usize,
    ) -> FilterResult {
        let mut result = FilterResult::Accept;

        for filter in &self.filters {
            result = result.and(filter.can_accept_from(ctx, from, size).await);
        }

        policy!("MAIL FROM {from} (size {size}) = {result}");
        result
    }

    async fn can_deliver_to(
        &self,
        ctx: &SessionContext,
        to: &Mailbox,
        from: &Mailbox,
    ) -> FilterResult {
        let mut result = FilterResult::Accept;

        for filter in &self.filters {
            result = result.and(filter.can_deliver_to(ctx, to, from).await);
        }

        policy!("RCPT TO {to} from {from} = {result}");
        result
    }
}
