//! Line codec for records
//!
//! Each record is stored as one compact JSON object on a single line.
//! JSON string escaping guarantees that encoded text never contains a raw
//! newline; the check in [`LineCodec::encode`] keeps that true for any
//! custom `Serialize` implementation as well.
//!
//! `encode` only returns lines that `decode` reads back to the same document.
//! Values JSON cannot carry (NaN or infinite floats become `null`) are
//! rejected before anything is written.

use thiserror::Error;

use crate::domain::Record;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoded record contains a line break")]
    EmbeddedNewline,

    #[error("Record has no id")]
    MissingId,

    #[error("Record does not survive encoding: {0}")]
    Unrepresentable(String),
}

/// Encodes and decodes records as single lines of text
pub struct LineCodec;

impl LineCodec {
    /// Encodes a stored record into one line (without terminator)
    pub fn encode<R: Record>(record: &R) -> Result<String, CodecError> {
        if record.id().is_none() {
            return Err(CodecError::MissingId);
        }

        let line = serde_json::to_string(record)?;
        if line.contains('\n') || line.contains('\r') {
            return Err(CodecError::EmbeddedNewline);
        }

        Self::verify::<R>(&line)?;
        Ok(line)
    }

    /// Decodes one line into a record that must carry an id
    pub fn decode<R: Record>(line: &str) -> Result<R, CodecError> {
        let record: R = serde_json::from_str(line)?;
        if record.id().is_none() {
            return Err(CodecError::MissingId);
        }
        Ok(record)
    }

    /// Checks that `line` decodes into a record that encodes to the same JSON
    fn verify<R: Record>(line: &str) -> Result<(), CodecError> {
        let echo: R = serde_json::from_str(line)
            .map_err(|e| CodecError::Unrepresentable(e.to_string()))?;

        // Compared as values so that map key order does not matter
        let written: serde_json::Value = serde_json::from_str(line)?;
        let reread = serde_json::to_value(&echo)?;
        if written != reread {
            return Err(CodecError::Unrepresentable(
                "decoded record differs from the encoded one".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Company, Invoice, InvoiceEntry, RecordId, Vat};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_invoice(id: u64, number: &str) -> Invoice {
        let day = NaiveDate::from_ymd_opt(2019, 3, 26).unwrap();
        Invoice::new(number, day, day, Company::new(1, "S"), Company::new(2, "B"))
            .with_id(RecordId::new(id).unwrap())
    }

    #[test]
    fn encode_is_single_line() {
        let mut invoice = make_invoice(1, "multi\nline\r\nnumber");
        invoice.buyer.address = "Street 1\nCity".to_string();

        let line = LineCodec::encode(&invoice).unwrap();
        assert!(!line.contains('\n'));

        let decoded: Invoice = LineCodec::decode(&line).unwrap();
        assert_eq!(decoded, invoice);
    }

    #[test]
    fn encode_rejects_unsaved_record() {
        let mut invoice = make_invoice(1, "FV/1");
        invoice.id = None;

        assert!(matches!(
            LineCodec::encode(&invoice),
            Err(CodecError::MissingId)
        ));
    }

    #[test]
    fn decode_rejects_malformed_line() {
        let result = LineCodec::decode::<Invoice>("{not json");
        assert!(matches!(result, Err(CodecError::Json(_))));
    }

    #[test]
    fn decode_rejects_line_without_id() {
        let mut invoice = make_invoice(1, "FV/1");
        invoice.id = None;
        let line = serde_json::to_string(&invoice).unwrap();

        assert!(matches!(
            LineCodec::decode::<Invoice>(&line),
            Err(CodecError::MissingId)
        ));
    }

    #[test]
    fn encode_rejects_non_finite_floats() {
        for quantity in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut invoice = make_invoice(1, "FV/1");
            invoice.entries.push(InvoiceEntry::from_price(1, "X", 1.0, "szt.", 100, Vat::Vat0));
            invoice.entries[0].quantity = quantity;

            assert!(matches!(
                LineCodec::encode(&invoice),
                Err(CodecError::Unrepresentable(_))
            ));
        }
    }

    #[test]
    fn fractional_quantities_survive() {
        let invoice = make_invoice(1, "FV/1").with_entry(InvoiceEntry::from_price(
            1,
            "Cable",
            243638.06514285714,
            "m",
            1,
            Vat::Vat23,
        ));

        let decoded: Invoice = LineCodec::decode(&LineCodec::encode(&invoice).unwrap()).unwrap();
        assert_eq!(decoded.entries[0].quantity, 243638.06514285714);
        assert_eq!(decoded, invoice);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            id in 1u64..u64::MAX,
            number in ".*",
            product in ".*",
            seller_name in ".*",
            buyer_address in ".*",
            quantity in proptest::num::f64::NORMAL | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL,
            price in -1_000_000i64..1_000_000,
        ) {
            let mut invoice = make_invoice(id, &number);
            invoice.seller.name = seller_name;
            invoice.buyer.address = buyer_address;
            invoice.entries.push(InvoiceEntry {
                id: 1,
                product_name: product,
                quantity,
                unit: "szt.".to_string(),
                price,
                nett_value: price,
                gross_value: price,
                vat_rate: Vat::Vat8,
            });

            let line = LineCodec::encode(&invoice).unwrap();
            prop_assert!(!line.contains('\n'));

            let decoded: Invoice = LineCodec::decode(&line).unwrap();
            prop_assert_eq!(decoded, invoice);
        }
    }
}
