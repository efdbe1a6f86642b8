//! invoice-store - an embedded line-per-record invoice store
//!
//! Invoices are kept as one JSON document per line in a flat file. The
//! [`storage::RecordStore`] provides CRUD access with identifier assignment
//! and in-process locking; [`service::InvoiceService`] and the `invoices`
//! binary sit on top of it.

pub mod cli;
pub mod domain;
pub mod service;
pub mod storage;

pub use domain::{Company, Invoice, InvoiceEntry, Record, RecordId, Vat};
pub use service::{InvoiceService, ServiceError};
pub use storage::{InvoiceStore, RecordStore, StoreError};
