//! Invoice service
//!
//! A thin layer over [`InvoiceStore`] for callers that think in domain
//! outcomes: missing invoices become empty results, storage failures become
//! a generic [`ServiceError::Failed`] carrying the store error as its source.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Invoice, RecordId};
use crate::storage::{InvoiceStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl ServiceError {
    fn failed(message: &str) -> impl FnOnce(StoreError) -> ServiceError + '_ {
        move |source| ServiceError::Failed {
            message: message.to_string(),
            source,
        }
    }
}

/// Domain-level access to stored invoices
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<InvoiceStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &InvoiceStore {
        &self.store
    }

    pub fn get_all_invoices(&self) -> Result<Vec<Invoice>, ServiceError> {
        self.store
            .get_all()
            .map_err(ServiceError::failed("Failed to get all invoices"))
    }

    /// Invoices issued within `[from, to]`, both ends inclusive
    pub fn get_all_invoices_by_date(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Invoice>, ServiceError> {
        if from > to {
            return Err(ServiceError::InvalidArgument(format!(
                "from date {} is after to date {}",
                from, to
            )));
        }

        let invoices = self
            .store
            .get_all()
            .map_err(ServiceError::failed("Failed to get invoices in date range"))?;

        Ok(invoices
            .into_iter()
            .filter(|invoice| invoice.issued_between(from, to))
            .collect())
    }

    /// Invoices whose buyer has the given company id
    pub fn get_all_invoices_by_buyer(&self, company_id: u64) -> Result<Vec<Invoice>, ServiceError> {
        let invoices = self
            .store
            .get_all()
            .map_err(ServiceError::failed("Failed to get invoices for buyer"))?;

        Ok(invoices
            .into_iter()
            .filter(|invoice| invoice.buyer.id == company_id)
            .collect())
    }

    /// Invoices whose seller has the given company id
    pub fn get_all_invoices_by_seller(
        &self,
        company_id: u64,
    ) -> Result<Vec<Invoice>, ServiceError> {
        let invoices = self
            .store
            .get_all()
            .map_err(ServiceError::failed("Failed to get invoices for seller"))?;

        Ok(invoices
            .into_iter()
            .filter(|invoice| invoice.seller.id == company_id)
            .collect())
    }

    pub fn get_invoice(&self, id: RecordId) -> Result<Option<Invoice>, ServiceError> {
        match self.store.get(id) {
            Ok(found) => Ok(found),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(ServiceError::failed("Failed to get invoice")(e)),
        }
    }

    pub fn save_invoice(&self, invoice: Invoice) -> Result<Invoice, ServiceError> {
        self.store
            .save(invoice)
            .map_err(ServiceError::failed("Failed to save invoice"))
    }

    /// Deletes an invoice; returns false if there was nothing to delete
    pub fn delete_invoice(&self, id: RecordId) -> Result<bool, ServiceError> {
        match self.store.delete(id) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(ServiceError::failed("Failed to delete invoice")(e)),
        }
    }

    pub fn delete_all_invoices(&self) -> Result<(), ServiceError> {
        match self.store.delete_all() {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(ServiceError::failed("Failed to delete all invoices")(e)),
        }
    }

    pub fn invoice_exists(&self, id: RecordId) -> Result<bool, ServiceError> {
        self.store
            .exists(id)
            .map_err(ServiceError::failed("Failed to check invoice"))
    }

    pub fn count_invoices(&self) -> Result<usize, ServiceError> {
        self.store
            .count()
            .map_err(ServiceError::failed("Failed to count invoices"))
    }
}
