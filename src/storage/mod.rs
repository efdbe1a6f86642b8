//! # Storage Layer
//!
//! Persistence for records as one JSON document per line in a flat file.
//!
//! ## Layers
//!
//! | Layer | Type | Responsibility |
//! |-------|------|----------------|
//! | Line file | [`LineFile`] | Read, append, remove and rewrite text lines |
//! | Codec | [`LineCodec`] | Record <-> single line of JSON |
//! | Store | [`RecordStore`] | CRUD keyed by [`RecordId`](crate::domain::RecordId) |
//! | Config | [`Config`] | Where the record file lives |
//!
//! ## Concurrency Safety
//!
//! - [`RecordStore`] serializes every operation behind one in-process lock,
//!   which also guards the id counter
//! - All rewrites are atomic (temp file + rename)
//! - [`LineFile`] takes advisory `fs2` locks per file call; these do not
//!   make concurrent use from several processes safe
//!
//! ## File Format
//!
//! ```text
//! {"id":1,"number":"FV/1/2019","issuedDate":"2019-03-26",...}
//! {"id":2,"number":"FV/2/2019","issuedDate":"2019-03-27",...}
//! ```

mod codec;
mod config;
mod error;
mod line_file;
mod store;

pub use codec::{CodecError, LineCodec};
pub use config::{Config, ConfigError, DatabaseConfig, OutputConfig, OutputFormat};
pub use error::{ErrorKind, StoreError};
pub use line_file::LineFile;
pub use store::{InvoiceStore, RecordStore};
