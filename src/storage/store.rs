//! Record store over a line file
//!
//! Records live in a single file with one JSON object per line. Every
//! operation runs under one exclusive lock per store instance, so the
//! read-scan-then-mutate sequences (existence check before update,
//! scan-then-remove before delete) behave like a single-writer table.
//!
//! Mutations that change existing lines rewrite the whole file through
//! [`LineFile::rewrite`]; only inserts append. Line positions are never
//! used as record addresses.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::codec::LineCodec;
use super::config::Config;
use super::error::StoreError;
use super::line_file::LineFile;
use crate::domain::{Invoice, Record, RecordId};

/// Store of invoices, the record type this crate ships with
pub type InvoiceStore = RecordStore<Invoice>;

/// Identifier counter, guarded together with the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Counter {
    /// Not seeded yet; the first insertion scans the file
    Unseeded,
    Next(RecordId),
    /// `u64::MAX` was handed out
    Exhausted,
}

/// State guarded by the store lock
struct Inner {
    file: LineFile,
    counter: Counter,
}

/// CRUD access to records kept in a JSONL file
pub struct RecordStore<R> {
    path: PathBuf,
    inner: Mutex<Inner>,
    _record: std::marker::PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not touched until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            inner: Mutex::new(Inner {
                file: LineFile::new(path.clone()),
                counter: Counter::Unseeded,
            }),
            path,
            _record: std::marker::PhantomData,
        }
    }

    /// Creates a store at the file path from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.database.file_path.clone())
    }

    /// Returns the path to the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts a record without id, or replaces the stored record with the same id
    pub fn save(&self, record: R) -> Result<R, StoreError> {
        let mut inner = self.inner.lock();
        match record.id() {
            None => Self::insert(&mut inner, record),
            Some(id) => Self::update(&inner, id, record),
        }
    }

    /// Removes every line holding the record with `id`
    pub fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let inner = self.inner.lock();
        if !inner.file.exists() {
            warn!(%id, path = %self.path.display(), "delete on missing record file");
            return Err(StoreError::NotFound(format!(
                "Record file does not exist: {}",
                self.path.display()
            )));
        }

        let lines = inner.file.read_all_lines()?;
        let mut kept = Vec::with_capacity(lines.len());
        let mut removed = 0usize;

        for (line_num, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: R = decode_line(line, line_num)?;
            if record.id() == Some(id) {
                removed += 1;
            } else {
                kept.push(line.as_str());
            }
        }

        if removed == 0 {
            warn!(%id, "delete of unknown record");
            return Err(StoreError::NotFound(format!("Record not found: {}", id)));
        }

        inner.file.rewrite(&kept)?;
        debug!(%id, removed, "deleted record");
        Ok(())
    }

    /// Returns the record with `id`, if present
    pub fn get(&self, id: RecordId) -> Result<Option<R>, StoreError> {
        let inner = self.inner.lock();
        Self::ensure_file(&inner)?;

        let found = Self::read_records(&inner.file)?
            .into_iter()
            .find(|record| record.id() == Some(id));

        debug!(%id, found = found.is_some(), "get record");
        Ok(found)
    }

    /// Returns all records in file order
    pub fn get_all(&self) -> Result<Vec<R>, StoreError> {
        let inner = self.inner.lock();
        Self::read_all_locked(&inner)
    }

    /// Empties the backing file; the file itself must exist
    pub fn delete_all(&self) -> Result<(), StoreError> {
        let inner = self.inner.lock();
        if !inner.file.exists() {
            warn!(path = %self.path.display(), "delete_all on missing record file");
            return Err(StoreError::NotFound(format!(
                "Record file does not exist: {}",
                self.path.display()
            )));
        }

        inner.file.truncate()?;
        debug!(path = %self.path.display(), "deleted all records");
        Ok(())
    }

    /// Returns true if a record with `id` is stored
    pub fn exists(&self, id: RecordId) -> Result<bool, StoreError> {
        let inner = self.inner.lock();
        Self::exists_locked(&inner, id)
    }

    /// Number of records currently in the file
    pub fn count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.lock();
        Ok(Self::read_all_locked(&inner)?.len())
    }

    fn insert(inner: &mut Inner, record: R) -> Result<R, StoreError> {
        Self::ensure_file(inner)?;

        let next_id = if inner.file.is_empty()? {
            if !matches!(inner.counter, Counter::Unseeded | Counter::Next(RecordId::FIRST)) {
                info!("record file is empty, restarting ids at 1");
            }
            RecordId::FIRST
        } else {
            match inner.counter {
                Counter::Next(id) => id,
                Counter::Exhausted => return Err(StoreError::IdsExhausted { last: u64::MAX }),
                Counter::Unseeded => {
                    let max = Self::read_records(&inner.file)?
                        .iter()
                        .filter_map(|r| r.id())
                        .max();
                    let seeded = match max {
                        None => RecordId::FIRST,
                        Some(max) => max
                            .next()
                            .ok_or(StoreError::IdsExhausted { last: max.get() })?,
                    };
                    info!(next_id = %seeded, "seeded id counter from record file");
                    seeded
                }
            }
        };

        let stored = record.with_id(next_id);
        let line = encode_record(&stored)?;
        inner.file.append_line(&line)?;
        inner.counter = next_id.next().map_or(Counter::Exhausted, Counter::Next);

        debug!(id = %next_id, "inserted record");
        Ok(stored)
    }

    fn update(inner: &Inner, id: RecordId, record: R) -> Result<R, StoreError> {
        if !Self::exists_locked(inner, id)? {
            warn!(%id, "update of unknown record");
            return Err(StoreError::NotFound(format!(
                "Update failed, record does not exist: {}",
                id
            )));
        }

        let updated_line = encode_record(&record)?;
        let lines = inner.file.read_all_lines()?;
        let mut rewritten = Vec::with_capacity(lines.len());
        let mut replaced = false;

        for (line_num, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let existing: R = decode_line(line, line_num)?;
            if existing.id() != Some(id) {
                rewritten.push(line.as_str());
            } else if !replaced {
                // Updated record takes the place of the first match; stale copies are dropped
                rewritten.push(updated_line.as_str());
                replaced = true;
            }
        }

        inner.file.rewrite(&rewritten)?;
        debug!(%id, "updated record");
        Ok(record)
    }

    fn exists_locked(inner: &Inner, id: RecordId) -> Result<bool, StoreError> {
        Self::ensure_file(inner)?;
        if inner.file.is_empty()? {
            return Ok(false);
        }

        Ok(Self::read_records(&inner.file)?
            .iter()
            .any(|record| record.id() == Some(id)))
    }

    fn read_all_locked(inner: &Inner) -> Result<Vec<R>, StoreError> {
        Self::ensure_file(inner)?;
        if inner.file.is_empty()? {
            return Ok(Vec::new());
        }
        Self::read_records(&inner.file)
    }

    fn ensure_file(inner: &Inner) -> Result<(), StoreError> {
        if !inner.file.exists() {
            debug!(path = %inner.file.path().display(), "creating record file");
            inner.file.create()?;
        }
        Ok(())
    }

    fn read_records(file: &LineFile) -> Result<Vec<R>, StoreError> {
        let lines = file.read_all_lines()?;
        let mut records = Vec::with_capacity(lines.len());

        for (line_num, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(decode_line(line, line_num)?);
        }

        Ok(records)
    }
}

fn decode_line<R: Record>(line: &str, line_num: usize) -> Result<R, StoreError> {
    LineCodec::decode(line).map_err(|source| StoreError::Codec {
        context: format!("Failed to parse record at line {}", line_num + 1),
        source,
    })
}

fn encode_record<R: Record>(record: &R) -> Result<String, StoreError> {
    LineCodec::encode(record).map_err(|source| StoreError::Codec {
        context: "Failed to serialize record".to_string(),
        source,
    })
}
