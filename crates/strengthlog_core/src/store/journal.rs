//! Append-only journal of store mutations.
//!
//! Record layout (all integers little-endian):
//!
//! ```text
//! magic "SLJR" (4) | version u16 (2) | length u32 (4) | CBOR payload | crc32 (4)
//! ```
//!
//! The CRC covers everything before it. Replay applies records in order. A
//! short or checksum-failing record at the very end is a torn write from an
//! interrupted append and is cut off; damage anywhere else is corruption.

use crate::error::{StoreError, StoreResult};
use crate::model::LocalWorkout;
use serde::{Deserialize, Serialize};
use strengthlog_storage::StorageBackend;

/// Magic bytes opening every journal record.
pub const JOURNAL_MAGIC: [u8; 4] = *b"SLJR";

/// Current journal format version.
pub const JOURNAL_VERSION: u16 = 1;

/// magic (4) + version (2) + length (4)
const HEADER_SIZE: usize = 10;

const CRC_SIZE: usize = 4;

/// A single logged store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalRecord {
    /// Insert or replace rows by id.
    Upsert {
        /// Rows to write.
        workouts: Vec<LocalWorkout>,
    },
    /// Set the completion flag of one row.
    SetCompleted {
        /// Row id.
        id: String,
        /// New flag value.
        completed: bool,
    },
    /// Remove one row.
    Delete {
        /// Row id.
        id: String,
    },
    /// Remove every completed row.
    DeleteCompleted,
    /// Remove every row.
    Clear,
}

impl JournalRecord {
    fn encode(&self) -> StoreResult<Vec<u8>> {
        let mut payload = Vec::new();
        ciborium::into_writer(self, &mut payload).map_err(|e| StoreError::codec(e.to_string()))?;

        let len = u32::try_from(payload.len())
            .map_err(|_| StoreError::codec("journal record payload too large"))?;

        let mut data = Vec::with_capacity(HEADER_SIZE + payload.len() + CRC_SIZE);
        data.extend_from_slice(&JOURNAL_MAGIC);
        data.extend_from_slice(&JOURNAL_VERSION.to_le_bytes());
        data.extend_from_slice(&len.to_le_bytes());
        data.extend_from_slice(&payload);
        let crc = compute_crc32(&data);
        data.extend_from_slice(&crc.to_le_bytes());
        Ok(data)
    }
}

/// Outcome of scanning a journal.
#[derive(Debug, Default)]
pub(crate) struct Replay {
    /// Records in append order.
    pub records: Vec<JournalRecord>,
    /// Offset where a torn tail was cut off, if any.
    pub truncated_at: Option<u64>,
}

/// Writes and replays journal records on a storage backend.
pub(crate) struct Journal {
    backend: Box<dyn StorageBackend>,
    sync_on_write: bool,
}

impl Journal {
    pub(crate) fn new(backend: Box<dyn StorageBackend>, sync_on_write: bool) -> Self {
        Self {
            backend,
            sync_on_write,
        }
    }

    /// Appends one record and returns its offset.
    ///
    /// On failure the journal is cut back to where it was, so a rejected
    /// mutation never resurfaces on replay and later records never land
    /// behind a partial one.
    pub(crate) fn append(&mut self, record: &JournalRecord) -> StoreResult<u64> {
        let data = record.encode()?;
        let offset = self.backend.size()?;

        let result = self.backend.append(&data).and_then(|at| {
            if self.sync_on_write {
                self.backend.sync()?;
            }
            Ok(at)
        });

        match result {
            Ok(offset) => Ok(offset),
            Err(err) => {
                if let Err(rollback) = self.backend.truncate(offset) {
                    tracing::warn!(offset, error = %rollback, "failed to roll back journal append");
                }
                Err(err.into())
            }
        }
    }

    /// Current journal size in bytes.
    pub(crate) fn size(&self) -> StoreResult<u64> {
        Ok(self.backend.size()?)
    }

    /// Reads every record, cutting off a torn tail.
    pub(crate) fn replay(&mut self) -> StoreResult<Replay> {
        let bytes = self.backend.read_all()?;
        let mut replay = Replay::default();
        let mut pos = 0usize;

        while pos < bytes.len() {
            match decode_at(&bytes, pos)? {
                Some((record, next)) => {
                    replay.records.push(record);
                    pos = next;
                }
                None => {
                    let offset = pos as u64;
                    tracing::warn!(
                        offset,
                        discarded = bytes.len() - pos,
                        "discarding torn journal tail"
                    );
                    self.backend.truncate(offset)?;
                    self.backend.sync()?;
                    replay.truncated_at = Some(offset);
                    break;
                }
            }
        }

        Ok(replay)
    }

    /// Replaces the whole journal with `records`.
    // TODO: write the compacted journal to a sibling file and rename it over
    // the old one, so a crash mid-compaction cannot lose rows.
    pub(crate) fn rewrite(&mut self, records: &[JournalRecord]) -> StoreResult<()> {
        self.backend.truncate(0)?;
        for record in records {
            let data = record.encode()?;
            self.backend.append(&data)?;
        }
        self.backend.sync()?;
        Ok(())
    }
}

/// Decodes the record starting at `pos`.
///
/// Returns `Ok(None)` for a torn tail, `Ok(Some((record, next_pos)))` for a
/// good record.
fn decode_at(bytes: &[u8], pos: usize) -> StoreResult<Option<(JournalRecord, usize)>> {
    let offset = pos as u64;
    let rest = &bytes[pos..];

    if rest.len() < HEADER_SIZE {
        return Ok(None);
    }
    if rest[0..4] != JOURNAL_MAGIC {
        return Err(StoreError::corrupted(offset, "bad record magic"));
    }
    let version = u16::from_le_bytes([rest[4], rest[5]]);
    if version != JOURNAL_VERSION {
        return Err(StoreError::corrupted(
            offset,
            format!("unsupported journal version {version}"),
        ));
    }
    let len = u32::from_le_bytes([rest[6], rest[7], rest[8], rest[9]]) as usize;
    let total = HEADER_SIZE + len + CRC_SIZE;
    if rest.len() < total {
        return Ok(None);
    }

    let body = &rest[..HEADER_SIZE + len];
    let stored = u32::from_le_bytes([
        rest[HEADER_SIZE + len],
        rest[HEADER_SIZE + len + 1],
        rest[HEADER_SIZE + len + 2],
        rest[HEADER_SIZE + len + 3],
    ]);
    let actual = compute_crc32(body);
    if stored != actual {
        if rest.len() == total {
            return Ok(None);
        }
        return Err(StoreError::corrupted(
            offset,
            format!("checksum mismatch: expected {stored:08x}, got {actual:08x}"),
        ));
    }

    let record: JournalRecord = ciborium::from_reader(&body[HEADER_SIZE..])
        .map_err(|e| StoreError::corrupted(offset, format!("undecodable record: {e}")))?;
    Ok(Some((record, pos + total)))
}

/// CRC32 (IEEE polynomial).
pub(crate) fn compute_crc32(data: &[u8]) -> u32 {
    const CRC32_TABLE: [u32; 256] = {
        let mut table = [0u32; 256];
        let mut i = 0;
        while i < 256 {
            let mut crc = i as u32;
            let mut j = 0;
            while j < 8 {
                if crc & 1 != 0 {
                    crc = (crc >> 1) ^ 0xEDB8_8320;
                } else {
                    crc >>= 1;
                }
                j += 1;
            }
            table[i] = crc;
            i += 1;
        }
        table
    };

    let mut crc = 0xFFFF_FFFF_u32;
    for &byte in data {
        let index = ((crc ^ u32::from(byte)) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    !crc
}
