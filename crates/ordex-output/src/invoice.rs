//! Invoice drop files: the PDF itself plus a control record naming it.

use chrono::NaiveDate;

use ordex_model::{ConfigError, OutputFile};

use crate::encoding::{Unmappable, encode_latin1};
use crate::payload::sanitize_component;

/// An invoice to hand to the order system.
#[derive(Debug, Clone)]
pub struct InvoiceRequest {
    pub order_number: String,
    pub invoice_number: String,
    /// PDF content, forwarded untouched.
    pub document: Vec<u8>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFiles {
    pub document: OutputFile,
    pub control: OutputFile,
}

impl InvoiceFiles {
    /// Document first, so the control record never lands before its PDF.
    pub fn into_vec(self) -> Vec<OutputFile> {
        vec![self.document, self.control]
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ConfigError::BlankField { field })
    } else {
        Ok(value)
    }
}

/// Builds the PDF and its control record.
///
/// Order and invoice numbers go through [`sanitize_component`], so names
/// never carry path separators and the control record always names the
/// PDF exactly as delivered.
pub fn build_invoice_files(request: &InvoiceRequest) -> Result<InvoiceFiles, ConfigError> {
    let order = sanitize_component(required("order number", &request.order_number)?);
    let invoice = sanitize_component(required("invoice number", &request.invoice_number)?);
    if request.document.is_empty() {
        return Err(ConfigError::EmptyDocument);
    }

    let stem = format!("{order}_{}_{invoice}", request.date.format("%Y%m%d"));
    let pdf_name = format!("FACT_{stem}.pdf");
    let control = encode_latin1(&format!("{order};{pdf_name}"), Unmappable::Drop);

    Ok(InvoiceFiles {
        document: OutputFile::new(pdf_name, request.document.clone()),
        control: OutputFile::new(format!("OU_FACT_{stem}"), control),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(order: &str, invoice: &str, document: &[u8]) -> InvoiceRequest {
        InvoiceRequest {
            order_number: order.to_string(),
            invoice_number: invoice.to_string(),
            document: document.to_vec(),
            date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        }
    }

    #[test]
    fn names_and_control_content() {
        let files = build_invoice_files(&request("1873036", "F42", b"%PDF-1.4")).unwrap();

        assert_eq!(files.document.name, "FACT_1873036_20250131_F42.pdf");
        assert_eq!(files.document.bytes, b"%PDF-1.4".to_vec());
        assert_eq!(files.control.name, "OU_FACT_1873036_20250131_F42");
        assert_eq!(
            files.control.bytes,
            b"1873036;FACT_1873036_20250131_F42.pdf".to_vec()
        );
    }

    #[test]
    fn unsafe_numbers_are_sanitized_in_both_files() {
        let files = build_invoice_files(&request("../../etc", "F€1/x", b"x")).unwrap();

        assert_eq!(files.document.name, "FACT_.._.._etc_20250131_F_1_x.pdf");
        assert_eq!(files.control.name, "OU_FACT_.._.._etc_20250131_F_1_x");
        assert!(!files.document.name.contains('/'));
        assert!(!files.control.name.contains('/'));
        let control = String::from_utf8(files.control.bytes.clone()).unwrap();
        assert!(control.ends_with(&files.document.name));
    }

    #[test]
    fn blank_numbers_and_empty_document_are_rejected() {
        assert_eq!(
            build_invoice_files(&request(" ", "F1", b"x")).unwrap_err(),
            ConfigError::BlankField {
                field: "order number"
            }
        );
        assert_eq!(
            build_invoice_files(&request("1", "", b"x")).unwrap_err(),
            ConfigError::BlankField {
                field: "invoice number"
            }
        );
        assert_eq!(
            build_invoice_files(&request("1", "F1", b"")).unwrap_err(),
            ConfigError::EmptyDocument
        );
    }
}
