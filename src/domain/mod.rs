//! Domain models for the invoice store
//!
//! Contains the document types without any I/O concerns.

mod id;
mod invoice;
mod record;

pub use id::{IdError, RecordId};
pub use invoice::{Company, Invoice, InvoiceEntry, Vat};
pub use record::Record;
