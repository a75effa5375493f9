//! # Event Choreography
//!
//! Committed writes reach bus subscribers in commit order; rejected writes
//! publish nothing.
//!
//! ```text
//! create ──→ DocumentCreated
//! sign   ──→ DocumentSigned
//! sign   ──→ DocumentSigned ──→ DocumentCompleted   (last signer)
//! ```
//!
//! Concurrent sessions over one store share its outbox, so signers racing
//! on a document still publish in the order their signatures committed.

#[cfg(test)]
mod tests {
    use crate::fixtures::{accounts, Harness, TestService, START_TIME};
    use async_trait::async_trait;
    use cs_01_document_signing::{
        CoSignService, DocumentStore, InMemoryContentStore, ManualTimeSource, WalletIdentity,
        WorkflowConfig,
    };
    use futures::future::join_all;
    use futures::FutureExt;
    use parking_lot::Mutex;
    use shared_bus::{DocumentEvent, EventFilter, EventPublisher, EventTopic, InMemoryEventBus};
    use shared_types::{AccountId, DocumentId};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    /// One store, many wallet sessions.
    struct Ledger {
        store: Arc<DocumentStore>,
        content: Arc<InMemoryContentStore>,
        clock: Arc<ManualTimeSource>,
    }

    impl Ledger {
        fn new() -> Self {
            Self {
                store: Arc::new(DocumentStore::new()),
                content: Arc::new(InMemoryContentStore::new()),
                clock: Arc::new(ManualTimeSource::new(START_TIME)),
            }
        }

        fn session(&self, account: &str, events: Arc<dyn EventPublisher>) -> Arc<TestService> {
            Arc::new(
                CoSignService::with_store(
                    self.store.clone(),
                    WorkflowConfig::for_testing(),
                    self.content.clone(),
                    Arc::new(WalletIdentity::connected(account)),
                    self.clock.clone(),
                    events,
                )
                .unwrap(),
            )
        }

        async fn document(&self, signers: &[&str], events: Arc<dyn EventPublisher>) -> DocumentId {
            self.session("0xc", events)
                .create_document(b"lease".to_vec(), accounts(signers))
                .await
                .unwrap()
                .id()
        }
    }

    /// Forwards to a bus, recording what it delivered. Once armed, the next
    /// publish waits for `release` before going through.
    #[derive(Default)]
    struct StallingPublisher {
        bus: InMemoryEventBus,
        delivered: Mutex<Vec<DocumentEvent>>,
        armed: AtomicBool,
        stalled: Notify,
        release: Notify,
    }

    #[async_trait]
    impl EventPublisher for StallingPublisher {
        async fn publish(&self, event: DocumentEvent) -> usize {
            if self.armed.swap(false, Ordering::SeqCst) {
                self.stalled.notify_one();
                self.release.notified().await;
            }
            self.delivered.lock().push(event.clone());
            self.bus.publish(event).await
        }

        fn events_published(&self) -> u64 {
            self.bus.events_published()
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle_event_order() {
        let h = Harness::new();
        let mut sub = h.bus.subscribe(EventFilter::all());

        let id = h.document_by("0xc", &["0xa", "0xb"]).await;
        h.wallet.connect("0xa");
        h.service.sign_document(id).await.unwrap();
        h.wallet.connect("0xb");
        h.service.sign_document(id).await.unwrap();

        let mut events = Vec::new();
        for _ in 0..4 {
            let event = timeout(Duration::from_secs(1), sub.recv())
                .await
                .expect("event should arrive")
                .expect("bus open");
            events.push(event);
        }

        assert_eq!(
            events[0],
            DocumentEvent::DocumentCreated {
                document_id: id,
                creator: AccountId::from("0xc"),
                content_id: h.service.get_document(id).unwrap().content_id().clone(),
                required_signers: accounts(&["0xa", "0xb"]),
            }
        );
        assert!(matches!(
            &events[1],
            DocumentEvent::DocumentSigned { signer, signed: 1, required: 2, .. } if signer.as_str() == "0xa"
        ));
        assert!(matches!(
            &events[2],
            DocumentEvent::DocumentSigned { signer, signed: 2, required: 2, .. } if signer.as_str() == "0xb"
        ));
        assert_eq!(
            events[3],
            DocumentEvent::DocumentCompleted {
                document_id: id,
                completed_at: START_TIME,
            }
        );
    }

    #[tokio::test]
    async fn test_topic_filter_sees_only_signing() {
        let h = Harness::new();
        let mut sub = h.bus.subscribe(EventFilter::topics(vec![EventTopic::Signing]));

        let id = h.document_by("0xc", &["0xa"]).await;
        h.wallet.connect("0xa");
        h.service.sign_document(id).await.unwrap();

        let first = timeout(Duration::from_secs(1), sub.recv()).await.unwrap().unwrap();
        assert!(matches!(first, DocumentEvent::DocumentSigned { .. }));
        let second = timeout(Duration::from_secs(1), sub.recv()).await.unwrap().unwrap();
        assert!(matches!(second, DocumentEvent::DocumentCompleted { .. }));
    }

    #[tokio::test]
    async fn test_document_filter_on_stream() {
        let h = Harness::new();
        let first = h.document_by("0xc", &["0xa"]).await;
        let second = h.document_by("0xc", &["0xa"]).await;
        let mut stream = h.bus.event_stream(EventFilter::for_documents(vec![second]));

        h.wallet.connect("0xa");
        h.service.sign_document(first).await.unwrap();
        h.service.sign_document(second).await.unwrap();

        let event = timeout(Duration::from_secs(1), stream.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.document_id(), second);
    }

    #[tokio::test]
    async fn test_rejections_publish_nothing() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xa"]).await;
        let published = h.bus.events_published();

        h.wallet.connect("0xz");
        assert!(h.service.sign_document(id).await.is_err());
        h.wallet.connect("0xc");
        assert!(h
            .service
            .create_document(b"x".to_vec(), vec![])
            .await
            .is_err());

        assert_eq!(h.bus.events_published(), published);
    }

    /// The first signer's event is stuck in delivery while the second signer
    /// commits and completes the document. Delivery still follows commit order.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stalled_delivery_keeps_commit_order() {
        let ledger = Ledger::new();
        let publisher = Arc::new(StallingPublisher::default());
        let id = ledger.document(&["0xa", "0xb"], publisher.clone()).await;

        publisher.armed.store(true, Ordering::SeqCst);
        let first = ledger.session("0xa", publisher.clone());
        let first_sign = tokio::spawn(async move { first.sign_document(id).await });
        publisher.stalled.notified().await;

        let second = ledger.session("0xb", publisher.clone());
        let second_sign = tokio::spawn(async move { second.sign_document(id).await });
        while !ledger.store.get(id).unwrap().is_completed() {
            tokio::task::yield_now().await;
        }
        publisher.release.notify_one();

        first_sign.await.unwrap().unwrap();
        second_sign.await.unwrap().unwrap();

        let delivered: Vec<DocumentEvent> = publisher
            .delivered
            .lock()
            .iter()
            .filter(|event| event.document_id() == id)
            .cloned()
            .collect();
        assert_eq!(delivered.len(), 4);
        assert!(matches!(
            &delivered[1],
            DocumentEvent::DocumentSigned { signer, signed: 1, .. } if signer.as_str() == "0xa"
        ));
        assert!(matches!(
            &delivered[2],
            DocumentEvent::DocumentSigned { signer, signed: 2, .. } if signer.as_str() == "0xb"
        ));
        assert!(matches!(
            delivered[3],
            DocumentEvent::DocumentCompleted { document_id, .. } if document_id == id
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_racing_signers_complete_last() {
        let signers = ["0xa", "0xb", "0xd", "0xe"];

        for _ in 0..25 {
            let ledger = Ledger::new();
            let bus = Arc::new(InMemoryEventBus::new());
            let id = ledger.document(&signers, bus.clone()).await;
            let mut sub = bus.watch(id);

            let signs = signers.iter().map(|signer| {
                let session = ledger.session(signer, bus.clone());
                tokio::spawn(async move { session.sign_document(id).await })
            });
            for result in join_all(signs).await {
                result.unwrap().unwrap();
            }

            let mut counts = Vec::new();
            loop {
                let event = timeout(Duration::from_secs(1), sub.recv())
                    .await
                    .expect("event should arrive")
                    .expect("bus open");
                match event {
                    DocumentEvent::DocumentSigned { signed, .. } => counts.push(signed),
                    DocumentEvent::DocumentCompleted { .. } => break,
                    other => panic!("unexpected event {other:?}"),
                }
            }
            assert_eq!(counts, vec![1, 2, 3, 4]);
            assert!(sub.recv().now_or_never().is_none());
        }
    }
}
