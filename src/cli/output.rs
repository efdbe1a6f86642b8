//! Output formatting for CLI commands

use serde::Serialize;

use crate::domain::Invoice;
use crate::storage;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<storage::OutputFormat> for OutputFormat {
    fn from(format: storage::OutputFormat) -> Self {
        match format {
            storage::OutputFormat::Text => OutputFormat::Text,
            storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a list of invoices as a table (text) or an array (JSON)
    pub fn invoices(&self, invoices: &[Invoice]) {
        if self.is_json() {
            self.data(&invoices);
            return;
        }

        if invoices.is_empty() {
            println!("No invoices found.");
            return;
        }

        println!(
            "{:<6} {:<16} {:<11} {:<11} {:<20} {:<20} {:>12}",
            "ID", "NUMBER", "ISSUED", "DUE", "SELLER", "BUYER", "GROSS"
        );
        println!("{}", "-".repeat(102));

        for invoice in invoices {
            let id = invoice.id.map(|id| id.to_string()).unwrap_or_default();
            println!(
                "{:<6} {:<16} {:<11} {:<11} {:<20} {:<20} {:>12}",
                id,
                truncate(&invoice.number, 16),
                invoice.issued_date,
                invoice.due_date,
                truncate(&invoice.seller.name, 20),
                truncate(&invoice.buyer.name, 20),
                format_amount(invoice.total_gross()),
            );
        }
    }

    /// Prints one invoice with its entries
    pub fn invoice(&self, invoice: &Invoice) {
        if self.is_json() {
            self.data(invoice);
            return;
        }

        let id = invoice.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        println!("Invoice {} ({})", invoice.number, id);
        println!("Issued:  {}", invoice.issued_date);
        println!("Due:     {}", invoice.due_date);
        println!("Seller:  {} [{}]", invoice.seller.name, invoice.seller.id);
        println!("Buyer:   {} [{}]", invoice.buyer.name, invoice.buyer.id);

        if !invoice.entries.is_empty() {
            println!();
            println!("Entries:");
            for entry in &invoice.entries {
                println!(
                    "  {} x{} {} @ {}  nett {}  VAT {}  gross {}",
                    entry.product_name,
                    entry.quantity,
                    entry.unit,
                    format_amount(entry.price),
                    format_amount(entry.nett_value),
                    entry.vat_rate.label(),
                    format_amount(entry.gross_value),
                );
            }
        }

        println!();
        println!(
            "Total: nett {}  gross {}",
            format_amount(invoice.total_nett()),
            format_amount(invoice.total_gross())
        );
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}

/// Formats minor currency units as a decimal amount (12345 -> "123.45")
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
