//! Turn raw store snapshots into typed records.

use remote_store_config::{ConfigRecord, parse_document};
use remote_store_data::{DocumentSnapshot, normalized};
use tracing::warn;

/// Decode an observed snapshot; a missing or invalid document yields `None`.
#[must_use]
pub fn decode_snapshot(snapshot: &DocumentSnapshot) -> Option<ConfigRecord> {
    let data = snapshot.data.as_ref()?;
    match parse_document(&normalized(data)) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(path = %snapshot.path, error = %err, "ignoring invalid app-config document");
            None
        }
    }
}
