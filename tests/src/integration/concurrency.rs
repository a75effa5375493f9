//! # Concurrency
//!
//! Many wallets hitting one store at once. Each wallet gets its own
//! `CoSignService` over the shared `DocumentStore`, the way separate client
//! sessions share one ledger.

#[cfg(test)]
mod tests {
    use crate::fixtures::{accounts, TestService, START_TIME};
    use cs_01_document_signing::{
        check_document, invariant_ids_increasing, CoSignService, DocumentStore, ErrorKind,
        InMemoryContentStore, ManualTimeSource, WalletIdentity, WorkflowConfig,
    };
    use futures::future::join_all;
    use rand::seq::SliceRandom;
    use shared_bus::InMemoryEventBus;
    use shared_types::DocumentId;
    use std::collections::HashSet;
    use std::sync::Arc;

    struct Shared {
        store: Arc<DocumentStore>,
        content: Arc<InMemoryContentStore>,
        clock: Arc<ManualTimeSource>,
        bus: Arc<InMemoryEventBus>,
    }

    impl Shared {
        fn new() -> Self {
            Self {
                store: Arc::new(DocumentStore::new()),
                content: Arc::new(InMemoryContentStore::new()),
                clock: Arc::new(ManualTimeSource::new(START_TIME)),
                bus: Arc::new(InMemoryEventBus::new()),
            }
        }

        fn session(&self, account: &str) -> Arc<TestService> {
            Arc::new(
                CoSignService::with_store(
                    self.store.clone(),
                    WorkflowConfig::for_testing(),
                    self.content.clone(),
                    Arc::new(WalletIdentity::connected(account)),
                    self.clock.clone(),
                    self.bus.clone(),
                )
                .unwrap(),
            )
        }
    }

    fn signer_names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("0x{:04x}", i)).collect()
    }

    /// Every required signer signs at the same time; all succeed once.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_signers_on_one_document() {
        let shared = Shared::new();
        let names = signer_names(32);
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let id = shared
            .session("0xcreator")
            .create_document(b"charter".to_vec(), accounts(&refs))
            .await
            .unwrap()
            .id();

        let mut order = names.clone();
        order.shuffle(&mut rand::thread_rng());
        let tasks = order.iter().map(|name| {
            let session = shared.session(name);
            tokio::spawn(async move { session.sign_document(id).await })
        });
        let results = join_all(tasks).await;

        let completions = results
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .filter(|doc| doc.is_completed())
            .count();
        assert_eq!(completions, 1);

        let doc = shared.store.get(id).unwrap();
        assert!(doc.is_completed());
        assert_eq!(doc.signatures().len(), names.len());
        assert!(check_document(&doc).is_ok());
    }

    /// The same signer racing itself gets exactly one signature in.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_same_signer_racing_itself() {
        let shared = Shared::new();
        let id = shared
            .session("0xcreator")
            .create_document(b"charter".to_vec(), accounts(&["0xa", "0xb"]))
            .await
            .unwrap()
            .id();

        let tasks = (0..16).map(|_| {
            let session = shared.session("0xa");
            tokio::spawn(async move { session.sign_document(id).await })
        });
        let results: Vec<_> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::DuplicateSignature));
        assert_eq!(shared.store.get(id).unwrap().signatures().len(), 1);
    }

    /// Parallel creators never collide on ids and the counter matches.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_creators_get_unique_ids() {
        let shared = Shared::new();
        let creators = signer_names(64);

        let tasks = creators.iter().map(|name| {
            let session = shared.session(name);
            let content = format!("doc from {name}").into_bytes();
            tokio::spawn(async move {
                session
                    .create_document(content, vec!["0xsigner".into()])
                    .await
            })
        });
        let ids: Vec<DocumentId> = join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap().id())
            .collect();

        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), creators.len());
        assert_eq!(shared.store.next_id(), DocumentId(creators.len() as u64));

        let all = shared.store.list_all();
        assert!(invariant_ids_increasing(&all).is_ok());
        for (index, doc) in all.iter().enumerate() {
            assert_eq!(doc.id(), DocumentId(index as u64));
        }
    }

    /// Signing different documents concurrently with creation.
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_signing_while_creating() {
        let shared = Shared::new();
        let first = shared
            .session("0xc")
            .create_document(b"first".to_vec(), accounts(&["0xa"]))
            .await
            .unwrap()
            .id();

        let signer = shared.session("0xa");
        let sign = tokio::spawn(async move { signer.sign_document(first).await });
        let creates = (0..20).map(|i| {
            let session = shared.session("0xc");
            tokio::spawn(async move {
                session
                    .create_document(format!("doc {i}").into_bytes(), vec!["0xa".into()])
                    .await
            })
        });
        let created = join_all(creates).await;

        assert!(sign.await.unwrap().unwrap().is_completed());
        assert!(created.into_iter().all(|r| r.unwrap().is_ok()));
        assert_eq!(shared.store.len(), 21);

        let pending = shared.session("0xa").my_pending_documents().unwrap();
        assert_eq!(pending.len(), 20);
        assert!(pending.iter().all(|d| d.id() != first));
    }
}
