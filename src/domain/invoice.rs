//! Invoice domain model
//!
//! An invoice is issued by a seller to a buyer and carries a list of
//! priced entries. Monetary amounts are kept in minor currency units
//! (e.g. grosze or cents) so that stored values never accumulate
//! floating-point drift.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::RecordId;
use super::record::Record;

/// VAT rate applied to an invoice entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Vat {
    #[serde(rename = "VAT_0")]
    Vat0,
    #[serde(rename = "VAT_5")]
    Vat5,
    #[serde(rename = "VAT_8")]
    Vat8,
    #[default]
    #[serde(rename = "VAT_23")]
    Vat23,
}

impl Vat {
    /// Returns the rate as a fraction (0.23 for 23%)
    pub fn rate(&self) -> f64 {
        match self {
            Vat::Vat0 => 0.0,
            Vat::Vat5 => 0.05,
            Vat::Vat8 => 0.08,
            Vat::Vat23 => 0.23,
        }
    }

    /// Returns a display label for the rate
    pub fn label(&self) -> &'static str {
        match self {
            Vat::Vat0 => "0%",
            Vat::Vat5 => "5%",
            Vat::Vat8 => "8%",
            Vat::Vat23 => "23%",
        }
    }
}

/// A party to an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
}

impl Company {
    /// Creates a company with only the identifying fields set
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: String::new(),
            tax_id: String::new(),
            account_number: String::new(),
            phone_number: String::new(),
            email: String::new(),
        }
    }
}

/// A single priced line of an invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceEntry {
    pub id: u64,
    pub product_name: String,
    pub quantity: f64,
    pub unit: String,
    /// Unit price in minor currency units
    pub price: i64,
    /// quantity * price, in minor currency units
    pub nett_value: i64,
    /// nett value including VAT, in minor currency units
    pub gross_value: i64,
    #[serde(default)]
    pub vat_rate: Vat,
}

impl InvoiceEntry {
    /// Creates an entry, deriving nett and gross values from quantity and price.
    ///
    /// Both values are rounded half-to-even to whole minor units.
    pub fn from_price(
        id: u64,
        product_name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        price: i64,
        vat_rate: Vat,
    ) -> Self {
        let nett = (quantity * price as f64).round_ties_even();
        let gross = (nett * (1.0 + vat_rate.rate())).round_ties_even();

        Self {
            id,
            product_name: product_name.into(),
            quantity,
            unit: unit.into(),
            price,
            nett_value: nett as i64,
            gross_value: gross as i64,
            vat_rate,
        }
    }

    /// Returns the VAT portion of the gross value
    pub fn vat_value(&self) -> i64 {
        self.gross_value - self.nett_value
    }
}

/// An invoice document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Assigned by the store on first save
    pub id: Option<RecordId>,
    pub number: String,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub seller: Company,
    pub buyer: Company,
    #[serde(default)]
    pub entries: Vec<InvoiceEntry>,
}

impl Invoice {
    /// Creates a new, unsaved invoice without entries
    pub fn new(
        number: impl Into<String>,
        issued_date: NaiveDate,
        due_date: NaiveDate,
        seller: Company,
        buyer: Company,
    ) -> Self {
        Self {
            id: None,
            number: number.into(),
            issued_date,
            due_date,
            seller,
            buyer,
            entries: Vec::new(),
        }
    }

    /// Adds an entry (builder style)
    pub fn with_entry(mut self, entry: InvoiceEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Sum of all entry nett values
    pub fn total_nett(&self) -> i64 {
        self.entries.iter().map(|e| e.nett_value).sum()
    }

    /// Sum of all entry gross values
    pub fn total_gross(&self) -> i64 {
        self.entries.iter().map(|e| e.gross_value).sum()
    }

    /// Returns true if the invoice was issued within `[from, to]`
    pub fn issued_between(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.issued_date >= from && self.issued_date <= to
    }
}

impl Record for Invoice {
    fn id(&self) -> Option<RecordId> {
        self.id
    }

    fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}
