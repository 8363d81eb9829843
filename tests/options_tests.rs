#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use courier::{
    EffectiveFilterFactory, FilterResult, MailboxFilter, MailboxFilterFactory, ServerOptions,
    SmtpServerOptions,
    mailbox::Mailbox,
    session::SessionContext,
    store::{MessageStore, MessageStoreFactory, Transaction},
};
use pretty_assertions::assert_eq;

type Journal = Arc<Mutex<Vec<String>>>;

/// A factory whose filters record every question they are asked.
#[derive(Debug)]
struct Recording {
    name: &'static str,
    verdict: FilterResult,
    journal: Journal,
}

struct RecordingFilter {
    name: &'static str,
    verdict: FilterResult,
    journal: Journal,
}

impl Recording {
    fn shared(
        name: &'static str,
        verdict: FilterResult,
        journal: &Journal,
    ) -> Arc<dyn MailboxFilterFactory> {
        Arc::new(Self {
            name,
            verdict,
            journal: Arc::clone(journal),
        })
    }
}

impl MailboxFilterFactory for Recording {
    fn create_instance(&self, _ctx: &SessionContext) -> Box<dyn MailboxFilter> {
        Box::new(RecordingFilter {
            name: self.name,
            verdict: self.verdict,
            journal: Arc::clone(&self.journal),
        })
    }
}

#[async_trait]
impl MailboxFilter for RecordingFilter {
    async fn can_accept_from(
        &self,
        _ctx: &SessionContext,
        from: &Mailbox,
        _size: usize,
    ) -> FilterResult {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}: from {from}", self.name));
        self.verdict
    }

    async fn can_deliver_to(
        &self,
        _ctx: &SessionContext,
        to: &Mailbox,
        _from: &Mailbox,
    ) -> FilterResult {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}: to {to}", self.name));
        self.verdict
    }
}

#[derive(Debug, Default)]
struct Discard {
    saved: Arc<Mutex<Vec<Transaction>>>,
}

#[async_trait]
impl MessageStore for Discard {
    async fn save(&self, _ctx: &SessionContext, transaction: &Transaction) -> anyhow::Result<()> {
        self.saved.lock().unwrap().push(transaction.clone());
        Ok(())
    }
}

impl MessageStoreFactory for Discard {
    fn create_instance(&self, _ctx: &SessionContext) -> Box<dyn MessageStore> {
        Box::new(Self {
            saved: Arc::clone(&self.saved),
        })
    }
}

fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

fn session() -> SessionContext {
    SessionContext::new(addr("192.0.2.10:40000"), addr("0.0.0.0:25"))
}

#[test]
fn endpoints_keep_insertion_order() {
    let endpoints = [
        addr("0.0.0.0:25"),
        addr("[::]:25"),
        addr("127.0.0.1:587"),
        addr("0.0.0.0:465"),
    ];

    for k in 0..=endpoints.len() {
        let mut builder = ServerOptions::builder();
        for endpoint in &endpoints[..k] {
            builder.add_endpoint(*endpoint);
        }

        let options = builder.build();
        assert_eq!(options.endpoints(), &endpoints[..k]);
    }
}

#[test]
fn single_factory_is_returned_unwrapped() {
    let journal = Journal::default();
    let only = Recording::shared("only", FilterResult::Accept, &journal);

    let options = ServerOptions::builder()
        .with_mailbox_filter_factory(Arc::clone(&only))
        .build();

    match options.mailbox_filter_factory() {
        EffectiveFilterFactory::Single(factory) => assert!(Arc::ptr_eq(&factory, &only)),
        EffectiveFilterFactory::Composite(_) => panic!("a single factory must not be wrapped"),
    }
}

#[tokio::test]
async fn no_factories_accept_everything() {
    let options = ServerOptions::builder().build();

    let factory = options.mailbox_filter_factory();
    let EffectiveFilterFactory::Composite(composite) = &factory else {
        panic!("no factories should produce an empty composite");
    };
    assert!(composite.is_empty());

    let filter = factory.create_instance(&session());
    let mailbox = Mailbox::new("postmaster", "example.org");

    assert_eq!(
        filter.can_accept_from(&session(), &mailbox, 0).await,
        FilterResult::Accept
    );
    assert_eq!(
        filter
            .can_deliver_to(&session(), &mailbox, &Mailbox::null())
            .await,
        FilterResult::Accept
    );
}

#[tokio::test]
async fn composite_consults_each_member_once_in_order() {
    let journal = Journal::default();
    let options = ServerOptions::builder()
        .with_mailbox_filter_factory(Recording::shared("F1", FilterResult::Accept, &journal))
        .with_mailbox_filter_factory(Recording::shared("F2", FilterResult::Reject, &journal))
        .with_mailbox_filter_factory(Recording::shared("F3", FilterResult::Accept, &journal))
        .build();

    let filter = options.mailbox_filter_factory().create_instance(&session());
    let from = Mailbox::new("sender", "example.net");
    let to = Mailbox::new("rcpt", "example.org");

    assert_eq!(
        filter.can_accept_from(&session(), &from, 512).await,
        FilterResult::Reject
    );
    assert_eq!(
        filter.can_deliver_to(&session(), &to, &from).await,
        FilterResult::Reject
    );

    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "F1: from sender@example.net",
            "F2: from sender@example.net",
            "F3: from sender@example.net",
            "F1: to rcpt@example.org",
            "F2: to rcpt@example.org",
            "F3: to rcpt@example.org",
        ]
    );
}

#[tokio::test]
async fn composite_keeps_most_severe_verdict() {
    let journal = Journal::default();
    let options = ServerOptions::builder()
        .with_mailbox_filter_factory(Recording::shared("defer", FilterResult::Defer, &journal))
        .with_mailbox_filter_factory(Recording::shared(
            "size",
            FilterResult::SizeLimitExceeded,
            &journal,
        ))
        .build();

    let filter = options.mailbox_filter_factory().create_instance(&session());

    assert_eq!(
        filter
            .can_accept_from(&session(), &Mailbox::new("a", "b.test"), usize::MAX)
            .await,
        FilterResult::SizeLimitExceeded
    );
}

#[test]
fn reads_are_idempotent() {
    let journal = Journal::default();
    let options = ServerOptions::builder()
        .with_endpoint(addr("0.0.0.0:25"))
        .with_mailbox_filter_factory(Recording::shared("F1", FilterResult::Accept, &journal))
        .with_mailbox_filter_factory(Recording::shared("F2", FilterResult::Accept, &journal))
        .build();

    assert_eq!(options.endpoints(), options.endpoints());
    assert_eq!(options.server_name(), options.server_name());

    let first = options.mailbox_filter_factory();
    let second = options.mailbox_filter_factory();
    assert_eq!(first.members().len(), second.members().len());
    assert!(
        first
            .members()
            .iter()
            .zip(second.members())
            .all(|(a, b)| Arc::ptr_eq(a, b))
    );
}

#[test]
fn builder_view_is_live() {
    let journal = Journal::default();
    let f1 = Recording::shared("F1", FilterResult::Accept, &journal);
    let f2 = Recording::shared("F2", FilterResult::Accept, &journal);

    let mut builder = ServerOptions::builder();
    builder.add_endpoint(addr("0.0.0.0:25"));
    builder.add_mailbox_filter_factory(Arc::clone(&f1));

    assert_eq!(builder.options().endpoints(), &[addr("0.0.0.0:25")]);
    assert!(matches!(
        builder.options().mailbox_filter_factory(),
        EffectiveFilterFactory::Single(_)
    ));

    builder.add_endpoint(addr("0.0.0.0:587"));
    builder.add_mailbox_filter_factory(Arc::clone(&f2));
    builder.set_max_message_size(1024);

    let view = builder.options();
    assert_eq!(
        view.endpoints(),
        &[addr("0.0.0.0:25"), addr("0.0.0.0:587")]
    );
    assert_eq!(view.max_message_size(), 1024);

    // The selector is not cached: the second registration is picked up.
    let EffectiveFilterFactory::Composite(composite) = view.mailbox_filter_factory() else {
        panic!("two registrations should produce a composite");
    };
    assert_eq!(composite.len(), 2);
    assert!(Arc::ptr_eq(&composite.factories()[0], &f1));
    assert!(Arc::ptr_eq(&composite.factories()[1], &f2));
}

#[test]
fn submission_scenario() {
    let journal = Journal::default();
    let f1 = Recording::shared("F1", FilterResult::Accept, &journal);
    let f2 = Recording::shared("F2", FilterResult::Accept, &journal);

    let mut builder = ServerOptions::builder();
    builder
        .set_max_message_size(4096)
        .add_endpoint(addr("0.0.0.0:25"))
        .add_endpoint(addr("0.0.0.0:587"))
        .add_mailbox_filter_factory(Arc::clone(&f1))
        .add_mailbox_filter_factory(Arc::clone(&f2))
        .set_allow_unsecure_authentication(false);

    let contract: Arc<dyn SmtpServerOptions> = builder.build();

    assert_eq!(contract.max_message_size(), 4096);
    assert_eq!(
        contract.endpoints(),
        &[addr("0.0.0.0:25"), addr("0.0.0.0:587")]
    );
    assert!(!contract.allow_unsecure_authentication());
    assert!(!contract.supports_tls());
    assert!(!contract.supports_authentication());

    let registered = contract.mailbox_filter_factories();
    assert_eq!(registered.len(), 2);
    assert!(Arc::ptr_eq(&registered[0], &f1));
    assert!(Arc::ptr_eq(&registered[1], &f2));

    let EffectiveFilterFactory::Composite(composite) = contract.mailbox_filter_factory() else {
        panic!("two registrations should produce a composite");
    };
    assert_eq!(composite.len(), 2);
    assert!(Arc::ptr_eq(&composite.factories()[0], &f1));
    assert!(Arc::ptr_eq(&composite.factories()[1], &f2));
}

#[tokio::test]
async fn message_store_factory_is_held_by_reference() {
    let store = Arc::new(Discard::default());
    let factory: Arc<dyn MessageStoreFactory> = Arc::clone(&store) as Arc<dyn MessageStoreFactory>;

    let options = ServerOptions::builder()
        .with_message_store_factory(Arc::clone(&factory))
        .build();

    let held = options.message_store_factory().unwrap();
    assert!(Arc::ptr_eq(held, &factory));

    let transaction = Transaction {
        from: Mailbox::new("sender", "example.net"),
        to: vec![Mailbox::new("rcpt", "example.org")],
        data: b"Subject: hi\r\n\r\nhello\r\n".to_vec(),
    };
    held.create_instance(&session())
        .save(&session(), &transaction)
        .await
        .unwrap();

    assert_eq!(*store.saved.lock().unwrap(), vec![transaction]);
}

#[tokio::test]
async fn frozen_options_are_shared_across_tasks() {
    let journal = Journal::default();
    let options = ServerOptions::builder()
        .with_endpoint(addr("0.0.0.0:25"))
        .with_mailbox_filter_factory(Recording::shared("F1", FilterResult::Accept, &journal))
        .build();

    let handles = (0..4)
        .map(|i| {
            let options = Arc::clone(&options);
            tokio::spawn(async move {
                let filter = options.mailbox_filter_factory().create_instance(&session());
                filter
                    .can_deliver_to(
                        &session(),
                        &Mailbox::new(format!("user{i}"), "example.org"),
                        &Mailbox::null(),
                    )
                    .await
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), FilterResult::Accept);
    }

    assert_eq!(journal.lock().unwrap().len(), 4);
}
