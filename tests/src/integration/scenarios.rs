//! # Signing Scenarios
//!
//! End-to-end flows through `CoSignService` with in-memory collaborators:
//! the connected wallet creates, required signers sign in turn, outsiders
//! and repeat signers are turned away.

#[cfg(test)]
mod tests {
    use crate::fixtures::{accounts, Harness, START_TIME};
    use cs_01_document_signing::{
        parse_signer_list, DocumentQueryApi, DocumentStatus, ErrorKind, SigningEligibility,
        ValidationError, WorkflowError,
    };
    use shared_types::{AccountId, DocumentId};

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// Two signers complete a document; the second signer cannot sign twice.
    #[tokio::test]
    async fn test_two_signers_then_repeat() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xx", "0xy"]).await;

        h.wallet.connect("0xx");
        let doc = h.service.sign_document(id).await.unwrap();
        assert_eq!(doc.signatures().len(), 1);
        assert_eq!(doc.status(), DocumentStatus::PartiallySigned);
        assert_eq!(doc.progress().to_string(), "1/2");

        h.clock.advance(60);
        h.wallet.connect("0xy");
        let doc = h.service.sign_document(id).await.unwrap();
        let signers: Vec<_> = doc.signatures().iter().map(|s| s.signer.as_str()).collect();
        assert_eq!(signers, vec!["0xx", "0xy"]);
        assert_eq!(doc.signatures()[0].timestamp, START_TIME);
        assert_eq!(doc.signatures()[1].timestamp, START_TIME + 60);
        assert!(doc.is_completed());

        let err = h.service.sign_document(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyCompleted);
        assert_eq!(h.service.get_document(id).unwrap(), doc);
    }

    /// A duplicate on a still-open document is reported as such.
    #[tokio::test]
    async fn test_duplicate_on_open_document() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xx", "0xy"]).await;

        h.wallet.connect("0xx");
        h.service.sign_document(id).await.unwrap();
        let err = h.service.sign_document(id).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::DuplicateSignature {
                document_id: id,
                signer: AccountId::from("0xx"),
            }
        );
    }

    /// An outsider is rejected and nothing changes.
    #[tokio::test]
    async fn test_outsider_cannot_sign() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xx"]).await;
        let before = h.service.get_document(id).unwrap();

        h.wallet.connect("0xz");
        let err = h.service.sign_document(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(h.service.get_document(id).unwrap(), before);
        assert_eq!(
            h.service.signing_eligibility(id).unwrap(),
            SigningEligibility::NotRequiredSigner
        );
    }

    /// Lookup on an empty store.
    #[tokio::test]
    async fn test_unknown_document_on_empty_store() {
        let h = Harness::new();
        assert_eq!(
            h.service.get_document(DocumentId(999)),
            Err(WorkflowError::NotFound(DocumentId(999)))
        );

        h.wallet.connect("0xx");
        let err = h.service.sign_document(DocumentId(999)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    /// An empty signer list appends nothing and leaves the counter alone.
    #[tokio::test]
    async fn test_empty_signer_list_rejected() {
        let h = Harness::new();
        h.wallet.connect("0xc");
        let err = h
            .service
            .create_document(b"contract".to_vec(), vec![])
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::Validation(ValidationError::NoRequiredSigners));
        assert!(h.service.get_all_documents().is_empty());
        assert_eq!(h.service.store().next_id(), DocumentId(0));
        assert_eq!(h.content.blob_count(), 0);
    }

    // =========================================================================
    // ACCOUNT VIEWS
    // =========================================================================

    #[tokio::test]
    async fn test_dashboard_views() {
        let h = Harness::new();
        let a = h.document_by("0xc", &["0xx", "0xy"]).await;
        let b = h.document_by("0xx", &["0xy"]).await;
        let c = h.document_by("0xc", &["0xy"]).await;

        h.wallet.connect("0xy");
        h.service.sign_document(c).await.unwrap();

        h.wallet.connect("0xc");
        let mine: Vec<_> = h.service.my_documents().unwrap().iter().map(|d| d.id()).collect();
        assert_eq!(mine, vec![a, c]);
        assert!(h.service.my_pending_documents().unwrap().is_empty());

        h.wallet.connect("0xy");
        let pending: Vec<_> = h
            .service
            .my_pending_documents()
            .unwrap()
            .iter()
            .map(|d| d.id())
            .collect();
        assert_eq!(pending, vec![a, b]);

        let signed = h.service.query().documents_signed_by(&AccountId::from("0xy"));
        assert_eq!(signed.len(), 1);
        assert_eq!(
            h.service.query().documents_created_by(&AccountId::from("0xx"))[0].id(),
            b
        );
    }

    /// Signers typed as a comma-separated list, as a creation form sends them.
    #[tokio::test]
    async fn test_create_from_signer_list_text() {
        let h = Harness::new();
        h.wallet.connect("0xc");
        let signers = parse_signer_list(" 0xx, 0xy ,0xz").unwrap();
        let doc = h
            .service
            .create_document(b"nda".to_vec(), signers)
            .await
            .unwrap();
        assert_eq!(doc.required_signers(), accounts(&["0xx", "0xy", "0xz"]).as_slice());
        assert_eq!(doc.signing_path(), format!("/sign/{}", doc.id()));
        assert_eq!(h.service.fetch_content(doc.id()).await.unwrap(), b"nda".to_vec());
    }

    /// A creator listed as a signer must sign like anyone else.
    #[tokio::test]
    async fn test_creator_listed_as_signer() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xc", "0xx"]).await;

        h.wallet.connect("0xx");
        let doc = h.service.sign_document(id).await.unwrap();
        assert!(!doc.is_completed());
        assert_eq!(doc.remaining_signers(), vec![&AccountId::from("0xc")]);

        h.wallet.connect("0xc");
        assert!(h.service.sign_document(id).await.unwrap().is_completed());
    }

    /// A disconnected wallet can read but not write.
    #[tokio::test]
    async fn test_disconnected_wallet() {
        let h = Harness::new();
        let id = h.document_by("0xc", &["0xx"]).await;
        h.wallet.disconnect();

        assert!(h.service.get_document(id).is_ok());
        let err = h.service.sign_document(id).await.unwrap_err();
        assert!(err.requires_authentication());
        assert!(h.service.my_pending_documents().unwrap_err().requires_authentication());
    }
}
