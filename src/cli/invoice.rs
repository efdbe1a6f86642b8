//! Invoice CLI commands

use std::io::Read;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use super::output::Output;
use crate::domain::{Invoice, RecordId};
use crate::service::InvoiceService;

/// Filters accepted by `invoices list`
#[derive(Debug, Default)]
pub struct ListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub buyer: Option<u64>,
    pub seller: Option<u64>,
}

/// Saves an invoice read from a JSON argument, or stdin when `document` is `-`
pub fn save(service: &InvoiceService, output: &Output, document: &str) -> Result<()> {
    let json = if document == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read invoice from stdin")?;
        buf
    } else {
        document.to_string()
    };

    let invoice: Invoice = serde_json::from_str(&json).context("Invalid invoice JSON")?;
    let is_update = invoice.id.is_some();
    output.verbose_ctx(
        "save",
        &format!("{} invoice {}", if is_update { "Updating" } else { "Inserting" }, invoice.number),
    );

    let saved = service.save_invoice(invoice)?;
    let id = saved.id.map(|id| id.to_string()).unwrap_or_default();

    if output.is_json() {
        output.data(&saved);
    } else if is_update {
        output.success(&format!("Updated invoice {}", id));
    } else {
        output.success(&format!("Saved invoice {}", id));
    }

    Ok(())
}

pub fn show(service: &InvoiceService, output: &Output, id: &str) -> Result<()> {
    let id = parse_id(id)?;

    match service.get_invoice(id)? {
        Some(invoice) => {
            output.invoice(&invoice);
            Ok(())
        }
        None => anyhow::bail!("Invoice not found: {}", id),
    }
}

pub fn list(service: &InvoiceService, output: &Output, filter: &ListFilter) -> Result<()> {
    output.verbose_ctx("list", &format!("Filter: {:?}", filter));

    let mut invoices = match (filter.from, filter.to) {
        (None, None) => service.get_all_invoices()?,
        (from, to) => service.get_all_invoices_by_date(
            from.unwrap_or(NaiveDate::MIN),
            to.unwrap_or(NaiveDate::MAX),
        )?,
    };

    if let Some(buyer) = filter.buyer {
        invoices.retain(|invoice| invoice.buyer.id == buyer);
    }
    if let Some(seller) = filter.seller {
        invoices.retain(|invoice| invoice.seller.id == seller);
    }

    output.verbose_ctx("list", &format!("Found {} invoices", invoices.len()));
    output.invoices(&invoices);
    Ok(())
}

pub fn delete(service: &InvoiceService, output: &Output, id: &str) -> Result<()> {
    let id = parse_id(id)?;

    if !service.delete_invoice(id)? {
        anyhow::bail!("Invoice not found: {}", id);
    }

    output.success(&format!("Deleted invoice {}", id));
    Ok(())
}

pub fn clear(service: &InvoiceService, output: &Output) -> Result<()> {
    service.delete_all_invoices()?;
    output.success("Deleted all invoices");
    Ok(())
}

pub fn count(service: &InvoiceService, output: &Output) -> Result<()> {
    let count = service.count_invoices()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "count": count }));
    } else {
        println!("{}", count);
    }
    Ok(())
}

pub fn exists(service: &InvoiceService, output: &Output, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let exists = service.invoice_exists(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({ "id": id, "exists": exists }));
    } else {
        println!("{}", exists);
    }
    Ok(())
}

fn parse_id(id: &str) -> Result<RecordId> {
    id.parse()
        .with_context(|| format!("Invalid invoice ID: {}", id))
}
