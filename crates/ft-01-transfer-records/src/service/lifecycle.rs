//! Record Lifecycle Controller
//!
//! `Absent → Active → Completed`, and `Active | Completed → Absent` by delete.
//! Every read-then-write decision here is based on a single-key read, never
//! on a rich query.

use super::TransferRecordService;
#[cfg(feature = "tracing-log")]
use crate::domain::composite::printable_key;
use crate::domain::config::IdentityMode;
use crate::domain::errors::{LedgerError, TransferError};
use crate::domain::index::RecordField;
use crate::domain::record::{PrivateTransferDetails, TransferInput, TransferRecord};
use crate::ports::inbound::TransferRecordsApi;
use crate::ports::outbound::{IdGenerator, Ledger, TimeSource};

impl<TS, IG> TransferRecordService<TS, IG>
where
    TS: TimeSource,
    IG: IdGenerator,
{
    /// Primary key and id for a new record.
    fn derive_key(
        &self,
        ledger: &dyn Ledger,
        input: &TransferInput,
    ) -> Result<(String, String), TransferError> {
        let id = self.id_generator.generate();
        match self.config.identity {
            IdentityMode::Generated => Ok((id.clone(), id)),
            IdentityMode::ContentAddressed => {
                let key = ledger
                    .create_composite_key(
                        &self.config.composite_key_namespace,
                        &[
                            input.originator.as_str(),
                            input.file_reference.as_str(),
                            input.recipient.as_str(),
                        ],
                    )
                    .map_err(|e| match e {
                        LedgerError::InvalidCompositeKey { message } => {
                            TransferError::invalid_argument(message)
                        }
                        other => other.into(),
                    })?;
                Ok((key, id))
            }
        }
    }

    /// Fetch and decode the record at `id`.
    fn load(&self, ledger: &dyn Ledger, id: &str) -> Result<TransferRecord, TransferError> {
        let bytes = ledger
            .get_state(id)?
            .ok_or_else(|| TransferError::NotFound { key: id.to_string() })?;
        TransferRecord::decode(id, &bytes, &self.config.doc_type)
    }
}

impl<TS, IG> TransferRecordsApi for TransferRecordService<TS, IG>
where
    TS: TimeSource,
    IG: IdGenerator,
{
    fn create_transfer(
        &self,
        ledger: &mut dyn Ledger,
        input: TransferInput,
    ) -> Result<String, TransferError> {
        let (key, id) = self.derive_key(ledger, &input)?;

        if ledger.get_state(&key)?.is_some() {
            #[cfg(feature = "tracing-log")]
            tracing::warn!("[ft-01] Transfer already exists: {}", printable_key(&key));
            return Err(TransferError::AlreadyExists { key });
        }

        let private = self.config.private_file_reference;
        let record = TransferRecord::new(
            &self.config.doc_type,
            id,
            &input,
            !private,
            self.time_source.now(),
        );
        ledger.put_state(&key, &record.to_bytes()?)?;

        if private {
            let details = PrivateTransferDetails {
                id: record.id.clone(),
                file_reference: input.file_reference,
            };
            ledger.put_private_data(&self.config.private_collection, &key, &details.to_bytes()?)?;
        }

        self.indexes.create_index(ledger, &key, &record)?;

        #[cfg(feature = "tracing-log")]
        tracing::info!(
            "[ft-01] Transfer created: {} ({} -> {})",
            printable_key(&key),
            record.originator,
            record.recipient
        );

        Ok(key)
    }

    fn read_transfer(&self, ledger: &dyn Ledger, id: &str) -> Result<Vec<u8>, TransferError> {
        ledger
            .get_state(id)?
            .ok_or_else(|| TransferError::NotFound { key: id.to_string() })
    }

    fn read_private_details(
        &self,
        ledger: &dyn Ledger,
        id: &str,
    ) -> Result<Vec<u8>, TransferError> {
        ledger
            .get_private_data(&self.config.private_collection, id)?
            .ok_or_else(|| TransferError::NotFound { key: id.to_string() })
    }

    fn read_raw(&self, ledger: &dyn Ledger, key: &str) -> Result<Vec<u8>, TransferError> {
        self.projector.raw(ledger, key)
    }

    fn delete_transfer(&self, ledger: &mut dyn Ledger, id: &str) -> Result<(), TransferError> {
        // The index keys come from the stored field values, so decode first
        let record = self.load(ledger, id)?;

        ledger.delete_state(id)?;
        self.indexes.drop_index(ledger, id, &record)?;

        if self.config.private_file_reference {
            ledger.delete_private_data(&self.config.private_collection, id)?;
        }

        #[cfg(feature = "tracing-log")]
        tracing::info!("[ft-01] Transfer deleted: {}", printable_key(id));

        Ok(())
    }

    fn complete_transfer(
        &self,
        ledger: &mut dyn Ledger,
        id: &str,
    ) -> Result<TransferRecord, TransferError> {
        let mut record = self.load(ledger, id)?;
        record.mark_complete(self.time_source.now());
        ledger.put_state(id, &record.to_bytes()?)?;

        #[cfg(feature = "tracing-log")]
        tracing::info!("[ft-01] Transfer completed: {}", printable_key(id));

        Ok(record)
    }

    fn query_by_originator(
        &self,
        ledger: &dyn Ledger,
        originator: &str,
    ) -> Result<Vec<u8>, TransferError> {
        self.projector
            .by_field(ledger, RecordField::Originator, originator)
    }

    fn query_by_recipient(
        &self,
        ledger: &dyn Ledger,
        recipient: &str,
    ) -> Result<Vec<u8>, TransferError> {
        self.projector
            .by_field(ledger, RecordField::Recipient, recipient)
    }

    fn query_ad_hoc(&self, ledger: &dyn Ledger, selector: &str) -> Result<Vec<u8>, TransferError> {
        self.projector.ad_hoc(ledger, selector)
    }

    fn history(&self, ledger: &dyn Ledger, id: &str) -> Result<Vec<u8>, TransferError> {
        self.history.history_of(ledger, id)
    }

    fn query_index(
        &self,
        ledger: &dyn Ledger,
        index: &str,
        values: &[&str],
    ) -> Result<Vec<u8>, TransferError> {
        self.indexes.scan(ledger, index, values)
    }
}
