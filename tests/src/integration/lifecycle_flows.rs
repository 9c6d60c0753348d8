//! # Lifecycle Flows
//!
//! Create, complete and delete driven through the dispatcher in each
//! identity and privacy mode, including the failure paths that must leave
//! the ledger untouched.

#[cfg(test)]
mod tests {
    use super::super::support::{array, fails, ok, setup};
    use ft_01_transfer_records::domain::composite::{is_composite_key, split_composite_key};
    use ft_01_transfer_records::{
        LedgerFaults, TransferConfig, TransferErrorKind, TransientMap, TRANSIENT_TRANSFER_KEY,
    };
    use node_runtime::{HostResponse, LedgerHost};
    use serde_json::Value;

    fn record(payload: &str) -> Value {
        serde_json::from_str(payload).expect("record JSON")
    }

    // =========================================================================
    // GENERATED IDENTITY
    // =========================================================================

    #[test]
    fn test_full_lifecycle_generated_ids() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());

        let id = ok(&mut ledger, &dispatcher, "create", &["Alice", "sha-1", "Bob", "q3.pdf"]);
        assert!(uuid::Uuid::parse_str(&id).is_ok());

        let created = record(&ok(&mut ledger, &dispatcher, "read", &[id.as_str()]));
        assert_eq!(created["docType"], "fileTransfer");
        assert_eq!(created["uuid"], id.as_str());
        assert_eq!(created["originator"], "alice");
        assert_eq!(created["fileName"], "q3.pdf");
        assert_eq!(created["transferComplete"], false);

        let completed = record(&ok(&mut ledger, &dispatcher, "complete", &[id.as_str()]));
        assert_eq!(completed["transferComplete"], true);
        assert!(completed["completionTime"].is_string());
        assert_eq!(completed["creationTime"], created["creationTime"]);

        assert_eq!(ok(&mut ledger, &dispatcher, "delete", &[id.as_str()]), "");
        assert_eq!(
            fails(&mut ledger, &dispatcher, "read", &[id.as_str()]),
            TransferErrorKind::NotFound
        );
        assert_eq!(ledger.keys().count(), 0);
    }

    #[test]
    fn test_same_payload_twice_yields_two_records() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());

        let first = ok(&mut ledger, &dispatcher, "create", &["alice", "h", "bob"]);
        let second = ok(&mut ledger, &dispatcher, "create", &["alice", "h", "bob"]);
        assert_ne!(first, second);

        let args = ["originator~hash", "alice", "h"];
        let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &args));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_transient_create() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());

        let mut transient = TransientMap::new();
        transient.insert(
            TRANSIENT_TRANSFER_KEY.to_string(),
            br#"{"Originator":"Alice","FileHash":"h9","Recipient":"Carol","FileName":"x.bin"}"#
                .to_vec(),
        );
        let response = ledger.invoke_with_transient(&dispatcher, "createTransient", &[], transient);
        assert!(response.is_ok(), "{}", response.message);
        let id = response.payload_str().unwrap().to_string();

        let created = record(&ok(&mut ledger, &dispatcher, "readTransfer", &[id.as_str()]));
        assert_eq!(created["recipient"], "carol");
        assert_eq!(created["fileHash"], "h9");
    }

    // =========================================================================
    // CONTENT-ADDRESSED IDENTITY
    // =========================================================================

    #[test]
    fn test_content_addressed_uniqueness() {
        let (dispatcher, mut ledger) = setup(TransferConfig::content_addressed());

        let key = ok(&mut ledger, &dispatcher, "create", &["Alice", "h1", "Bob"]);
        assert!(is_composite_key(&key));
        let (namespace, attributes) = split_composite_key(&key).unwrap();
        assert_eq!(namespace, "fileTransfer");
        assert_eq!(attributes, vec!["alice", "h1", "bob"]);

        let before = ledger.state(&key).unwrap().to_vec();
        assert_eq!(
            fails(&mut ledger, &dispatcher, "create", &["ALICE", "h1", "bob"]),
            TransferErrorKind::AlreadyExists
        );
        assert_eq!(ledger.state(&key).unwrap(), before.as_slice());

        // A different recipient is a different transfer
        ok(&mut ledger, &dispatcher, "create", &["alice", "h1", "carol"]);

        let stored = record(&ok(&mut ledger, &dispatcher, "read", &[key.as_str()]));
        assert!(uuid::Uuid::parse_str(stored["uuid"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_content_addressed_recreate_after_delete() {
        let (dispatcher, mut ledger) = setup(TransferConfig::content_addressed());

        let key = ok(&mut ledger, &dispatcher, "create", &["alice", "h1", "bob"]);
        ok(&mut ledger, &dispatcher, "delete", &[key.as_str()]);
        let again = ok(&mut ledger, &dispatcher, "create", &["alice", "h1", "bob"]);
        assert_eq!(key, again);
        assert_eq!(ledger.history_len(&key), 3);
    }

    // =========================================================================
    // PRIVATE FILE REFERENCE
    // =========================================================================

    #[test]
    fn test_private_file_reference_flow() {
        let (dispatcher, mut ledger) = setup(TransferConfig::private_default());

        let id = ok(&mut ledger, &dispatcher, "create", &["alice", "top-secret", "bob"]);

        let public = record(&ok(&mut ledger, &dispatcher, "read", &[id.as_str()]));
        assert!(public.get("fileHash").is_none());

        let private = record(&ok(&mut ledger, &dispatcher, "readPrivate", &[id.as_str()]));
        assert_eq!(private["fileHash"], "top-secret");
        assert_eq!(private["uuid"], id.as_str());

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["alice"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Key"], id.as_str());

        ok(&mut ledger, &dispatcher, "delete", &[id.as_str()]);
        assert_eq!(
            fails(&mut ledger, &dispatcher, "readPrivate", &[id.as_str()]),
            TransferErrorKind::NotFound
        );
    }

    // =========================================================================
    // FAILURE ATOMICITY
    // =========================================================================

    #[test]
    fn test_index_failure_leaves_nothing_behind() {
        let (dispatcher, ledger) = setup(TransferConfig::default());
        let mut ledger = ledger.with_faults(LedgerFaults::new().fail_index("originator~hash"));

        assert_eq!(
            fails(&mut ledger, &dispatcher, "create", &["alice", "h", "bob"]),
            TransferErrorKind::IndexWriteFailed
        );
        assert_eq!(ledger.keys().count(), 0);
    }

    #[test]
    fn test_delete_failure_keeps_record_and_index() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());
        let id = ok(&mut ledger, &dispatcher, "create", &["alice", "h", "bob"]);
        let keys_before: Vec<String> = ledger.keys().map(str::to_string).collect();

        ledger.set_faults(LedgerFaults::new().fail_index("originator~hash"));
        assert_eq!(
            fails(&mut ledger, &dispatcher, "delete", &[id.as_str()]),
            TransferErrorKind::IndexDeleteFailed
        );

        let keys_after: Vec<String> = ledger.keys().map(str::to_string).collect();
        assert_eq!(keys_before, keys_after);
    }

    #[test]
    fn test_corrupt_record_cannot_be_completed() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());
        ledger
            .execute(TransientMap::new(), |tx| {
                use ft_01_transfer_records::Ledger;
                tx.put_state("broken", br#"{"docType":"somethingElse"}"#)
            })
            .unwrap();

        assert_eq!(
            fails(&mut ledger, &dispatcher, "complete", &["broken"]),
            TransferErrorKind::DecodeFailed
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "delete", &["broken"]),
            TransferErrorKind::DecodeFailed
        );
    }

    #[test]
    fn test_argument_validation() {
        let (dispatcher, mut ledger) = setup(TransferConfig::default());

        assert_eq!(
            fails(&mut ledger, &dispatcher, "create", &["alice", "h"]),
            TransferErrorKind::InvalidArgument
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "create", &["", "h", "bob"]),
            TransferErrorKind::InvalidArgument
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "complete", &["a", "b"]),
            TransferErrorKind::InvalidArgument
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "transferFile", &[]),
            TransferErrorKind::InvalidArgument
        );
    }

    // =========================================================================
    // NODE HOST
    // =========================================================================

    #[test]
    fn test_host_lines_round_trip() {
        let (dispatcher, ledger) = setup(TransferConfig::default());
        let mut host = LedgerHost::new(ledger, dispatcher);

        let line = host
            .handle_line(r#"{"function":"create","args":["alice","h1","bob"]}"#)
            .unwrap();
        let created: HostResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(created.status, 200);

        let line = host
            .handle_line(&format!(r#"{{"function":"complete","args":["{}"]}}"#, created.payload))
            .unwrap();
        let completed: HostResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(record(&completed.payload)["transferComplete"], true);
        assert_eq!(host.ledger().history_len(&created.payload), 2);
    }
}
