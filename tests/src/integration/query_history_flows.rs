//! # Query and History Flows
//!
//! Rich queries, index scans and the per-key audit trail as a client sees
//! them through the dispatcher. Every payload must parse as a JSON array.

#[cfg(test)]
mod tests {
    use super::super::support::{array, fails, ok, setup, DefaultDispatcher};
    use chrono::{DateTime, Utc};
    use ft_01_transfer_records::{
        IndexSpec, InMemoryLedger, LedgerFaults, TransferConfig, TransferErrorKind,
    };

    fn seeded(config: TransferConfig) -> (DefaultDispatcher, InMemoryLedger, Vec<String>) {
        let (dispatcher, mut ledger) = setup(config);
        let ids = [
            ["Alice", "h1", "Bob"],
            ["alice", "h2", "Carol"],
            ["Dave", "h3", "bob"],
            ["erin", "h4", "frank"],
        ]
        .iter()
        .map(|args| ok(&mut ledger, &dispatcher, "create", args))
        .collect();
        (dispatcher, ledger, ids)
    }

    // =========================================================================
    // RICH QUERIES
    // =========================================================================

    #[test]
    fn test_query_by_party() {
        let (dispatcher, mut ledger, ids) = seeded(TransferConfig::default());

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["ALICE"]));
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row["Record"]["originator"], "alice");
            assert!(ids.iter().any(|id| row["Key"] == id.as_str()));
        }

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByRecipient", &["bob"]));
        assert_eq!(rows.len(), 2);

        let rows = array(&ok(&mut ledger, &dispatcher, "queryTransfersByRecipient", &["frank"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Record"]["fileHash"], "h4");

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["nobody"]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_ad_hoc_selectors() {
        let (dispatcher, mut ledger, _) = seeded(TransferConfig::default());

        let selector = r#"{"selector":{"docType":"fileTransfer",
            "$or":[{"originator":"dave"},{"recipient":"carol"}]}}"#;
        assert_eq!(array(&ok(&mut ledger, &dispatcher, "queryAdHoc", &[selector])).len(), 2);

        let selector = r#"{"selector":{"fileHash":{"$in":["h1","h2","h3"]}},"limit":2}"#;
        assert_eq!(array(&ok(&mut ledger, &dispatcher, "queryTransfers", &[selector])).len(), 2);

        let selector = r#"{"selector":{"fileName":{"$exists":true}}}"#;
        assert!(array(&ok(&mut ledger, &dispatcher, "queryAdHoc", &[selector])).is_empty());

        assert_eq!(
            fails(&mut ledger, &dispatcher, "queryAdHoc", &["{\"selector\":"]),
            TransferErrorKind::QueryExecutionFailed
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "queryAdHoc", &[r#"{"limit":1}"#]),
            TransferErrorKind::QueryExecutionFailed
        );
    }

    #[test]
    fn test_completed_records_visible_to_queries() {
        let (dispatcher, mut ledger, ids) = seeded(TransferConfig::default());
        ok(&mut ledger, &dispatcher, "complete", &[ids[0].as_str()]);

        let selector = r#"{"selector":{"transferComplete":true}}"#;
        let rows = array(&ok(&mut ledger, &dispatcher, "queryAdHoc", &[selector]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Key"], ids[0].as_str());
    }

    #[test]
    fn test_content_addressed_records_are_queryable() {
        let (dispatcher, mut ledger, keys) = seeded(TransferConfig::content_addressed());

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["alice"]));
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert!(keys.iter().any(|key| row["Key"] == key.as_str()));
        }

        let rows = array(&ok(&mut ledger, &dispatcher, "queryByRecipient", &["BOB"]));
        assert_eq!(rows.len(), 2);

        let selector = r#"{"selector":{"fileHash":"h4"}}"#;
        let rows = array(&ok(&mut ledger, &dispatcher, "queryAdHoc", &[selector]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Key"], keys[3].as_str());
        assert_eq!(rows[0]["Record"]["recipient"], "frank");
    }

    #[test]
    fn test_queries_without_rich_query_backend() {
        let (dispatcher, ledger, _) = seeded(TransferConfig::default());
        let mut ledger = ledger.with_rich_query(false);

        assert_eq!(
            fails(&mut ledger, &dispatcher, "queryByOriginator", &["alice"]),
            TransferErrorKind::QueryUnsupported
        );
        assert_eq!(
            fails(&mut ledger, &dispatcher, "queryAdHoc", &[r#"{"selector":{}}"#]),
            TransferErrorKind::QueryUnsupported
        );

        // Index scans are plain key-range reads
        let args = ["originator~hash", "alice"];
        let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &args));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_broken_iterators_are_released() {
        let (dispatcher, mut ledger, _) = seeded(TransferConfig::default());
        ledger.set_faults(LedgerFaults::new().fail_iterators_after(1));

        for (function, arg) in [
            ("queryByOriginator", "alice"),
            ("queryByRecipient", "bob"),
            ("queryAdHoc", r#"{"selector":{}}"#),
        ] {
            assert_eq!(
                fails(&mut ledger, &dispatcher, function, &[arg]),
                TransferErrorKind::QueryExecutionFailed
            );
            assert_eq!(ledger.open_iterators(), 0);
        }
    }

    // =========================================================================
    // INDEX SCANS
    // =========================================================================

    #[test]
    fn test_custom_indexes() {
        let config = TransferConfig {
            indexes: Some(vec![IndexSpec::originator_hash(), IndexSpec::recipient_hash()]),
            ..TransferConfig::default()
        };
        let (dispatcher, mut ledger, ids) = seeded(config);

        let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &["recipient~hash", "BOB"]));
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row["Index"], "recipient~hash");
            assert_eq!(row["Attributes"][0], "bob");
        }

        ok(&mut ledger, &dispatcher, "delete", &[ids[0].as_str()]);
        let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &["recipient~hash", "bob"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Id"], ids[2].as_str());

        assert_eq!(
            fails(&mut ledger, &dispatcher, "queryIndex", &["missing~index"]),
            TransferErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_content_addressed_index_ids_are_readable() {
        let (dispatcher, mut ledger, keys) = seeded(TransferConfig::content_addressed());

        let args = ["originator~hash", "alice"];
        let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &args));
        assert_eq!(rows.len(), 2);
        for row in &rows {
            let key = row["Id"].as_str().unwrap();
            assert!(keys.iter().any(|k| k == key));
            let stored: serde_json::Value =
                serde_json::from_str(&ok(&mut ledger, &dispatcher, "read", &[key])).unwrap();
            assert_eq!(stored["originator"], "alice");
            assert_eq!(stored["fileHash"], row["Attributes"][1]);
        }
    }

    #[test]
    fn test_raw_query_reads_any_key() {
        let (dispatcher, mut ledger, ids) = seeded(TransferConfig::default());

        let raw = ok(&mut ledger, &dispatcher, "query", &[ids[1].as_str()]);
        let record: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(record["recipient"], "carol");

        assert_eq!(
            fails(&mut ledger, &dispatcher, "query", &["no-such-key"]),
            TransferErrorKind::NotFound
        );
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    #[test]
    fn test_history_audit_trail() {
        let (dispatcher, mut ledger, ids) = seeded(TransferConfig::default());
        let id = ids[0].as_str();

        ok(&mut ledger, &dispatcher, "complete", &[id]);
        ok(&mut ledger, &dispatcher, "markTransferAsRead", &[id]);
        ok(&mut ledger, &dispatcher, "delete", &[id]);

        let entries = array(&ok(&mut ledger, &dispatcher, "history", &[id]));
        assert_eq!(entries.len(), 4);

        let timestamps: Vec<DateTime<Utc>> = entries
            .iter()
            .map(|e| e["Timestamp"].as_str().unwrap().parse().unwrap())
            .collect();
        assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));

        let tx_ids: Vec<&str> = entries.iter().map(|e| e["TxId"].as_str().unwrap()).collect();
        assert!(tx_ids.iter().all(|tx| !tx.is_empty()));

        assert_eq!(entries[0]["Value"]["transferComplete"], false);
        assert_eq!(entries[1]["Value"]["transferComplete"], true);
        assert_eq!(entries[2]["IsDelete"], false);
        assert_eq!(entries[3]["IsDelete"], true);
        assert!(entries[3]["Value"].is_null());
        assert_eq!(ledger.open_iterators(), 0);
    }

    #[test]
    fn test_lifecycle_visible_through_queries_in_every_identity_mode() {
        for config in [TransferConfig::default(), TransferConfig::content_addressed()] {
            let identity = config.identity;
            let (dispatcher, mut ledger) = setup(config);

            let key = ok(&mut ledger, &dispatcher, "create", &["Alice", "h1", "Bob"]);
            let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["alice"]));
            assert_eq!(rows.len(), 1, "{identity:?}");
            assert_eq!(rows[0]["Key"], key.as_str(), "{identity:?}");

            ok(&mut ledger, &dispatcher, "complete", &[key.as_str()]);
            let entries = array(&ok(&mut ledger, &dispatcher, "history", &[key.as_str()]));
            assert_eq!(entries.len(), 2, "{identity:?}");
            assert_eq!(entries[1]["Value"]["transferComplete"], true, "{identity:?}");

            ok(&mut ledger, &dispatcher, "delete", &[key.as_str()]);
            let rows = array(&ok(&mut ledger, &dispatcher, "queryByOriginator", &["alice"]));
            assert!(rows.is_empty(), "{identity:?}");
            let rows = array(&ok(&mut ledger, &dispatcher, "queryIndex", &["originator~hash"]));
            assert!(rows.is_empty(), "{identity:?}");
        }
    }

    #[test]
    fn test_history_of_unknown_key() {
        let (dispatcher, mut ledger, _) = seeded(TransferConfig::default());
        assert_eq!(ok(&mut ledger, &dispatcher, "history", &["never-written"]), "[]");
    }

    #[test]
    fn test_history_failures() {
        let (dispatcher, mut ledger, ids) = seeded(TransferConfig::default());
        ledger.set_faults(LedgerFaults::new().fail_history());

        assert_eq!(
            fails(&mut ledger, &dispatcher, "getHistoryForTransfer", &[ids[0].as_str()]),
            TransferErrorKind::QueryExecutionFailed
        );
    }
}
