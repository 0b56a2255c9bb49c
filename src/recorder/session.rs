//! Session buffer and JSON session files

use crate::pose::schema::{self, PoseRecordV1, SCHEMA_VERSION};
use crate::pose::types::PoseRecord;
use crate::recorder::error::{CaptureError, CaptureResult};
use serde::Serialize;
use std::path::Path;

/// Default output file for a capture session
pub const DEFAULT_OUTPUT_PATH: &str = "poses.json";

/// Append-only buffer of the records captured in one session
#[derive(Debug, Default)]
pub struct SessionBuffer {
    records: Vec<PoseRecord>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Records arrive in poll order, so elapsed times never
    /// go backwards.
    pub fn push(&mut self, record: PoseRecord) {
        debug_assert!(
            self.records
                .last()
                .map_or(true, |last| last.elapsed_time <= record.elapsed_time),
            "pose records must be appended in time order"
        );
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PoseRecord] {
        &self.records
    }
}

fn encode_pretty<T: Serialize>(value: &T) -> CaptureResult<Vec<u8>> {
    let mut data = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut data, formatter);
    value.serialize(&mut ser)?;
    Ok(data)
}

/// Serialize the whole session to `path` as a pretty-printed JSON array.
///
/// Returns the number of records written. Any failure is fatal; nothing is
/// retried and no partial fallback is attempted.
pub fn write_session(path: &Path, buffer: &SessionBuffer) -> CaptureResult<usize> {
    let data = encode_pretty(&schema::to_schema(buffer.records()))?;

    let write_failure = |source: std::io::Error| CaptureError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_failure)?;
    }
    std::fs::write(path, data).map_err(write_failure)?;

    tracing::info!(
        "Session written (path={}, records={}, schema=v{})",
        path.display(),
        buffer.len(),
        SCHEMA_VERSION
    );
    Ok(buffer.len())
}

/// Parse a session file written by `write_session`
pub fn read_session(path: &Path) -> CaptureResult<Vec<PoseRecord>> {
    let data = std::fs::read(path)?;
    let records: Vec<PoseRecordV1> = serde_json::from_slice(&data)?;
    Ok(records.into_iter().map(PoseRecord::from).collect())
}
