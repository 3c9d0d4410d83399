//! Front-door field validation for invoice records.
//!
//! The export pipeline itself trusts its input (records are validated by the
//! form layer before they reach the engine); this module exists for callers
//! that did not run that layer. Bounds and formats mirror the form schema.

use crate::invoice::InvoiceData;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn gstin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$").unwrap()
    })
}

fn pan_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$").unwrap())
}

fn account_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{9,18}$").unwrap())
}

fn ifsc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap())
}

fn check_len(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    required_message: &str,
    max: usize,
) {
    if value.is_empty() {
        errors.push(FieldError::new(field, required_message));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
}

fn check_range(errors: &mut Vec<FieldError>, field: &str, value: f64, min: f64, max: f64) {
    if !value.is_finite() || value < min {
        errors.push(FieldError::new(
            field,
            format!("must be at least {}", min),
        ));
    } else if value > max {
        errors.push(FieldError::new(field, format!("must be at most {}", max)));
    }
}

fn check_party(errors: &mut Vec<FieldError>, prefix: &str, party: &crate::invoice::Party) {
    check_len(
        errors,
        &format!("{}.name", prefix),
        &party.name,
        "name is required",
        100,
    );
    check_len(
        errors,
        &format!("{}.address", prefix),
        &party.address,
        "address is required",
        500,
    );
    if let Some(gstin) = party.gstin.as_deref() {
        if !gstin.is_empty() && !gstin_re().is_match(gstin) {
            errors.push(FieldError::new(
                format!("{}.gstin", prefix),
                "invalid GSTIN format",
            ));
        }
    }
    if let Some(pan) = party.pan.as_deref() {
        if !pan.is_empty() && !pan_re().is_match(pan) {
            errors.push(FieldError::new(
                format!("{}.pan", prefix),
                "invalid PAN format",
            ));
        }
    }
}

/// Validates every field of the record; returns all violations at once.
pub fn validate(data: &InvoiceData) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    check_len(
        &mut errors,
        "companyName",
        &data.company_name,
        "company name is required",
        100,
    );
    check_len(
        &mut errors,
        "serviceTitle",
        &data.service_title,
        "service title is required",
        50,
    );
    check_len(
        &mut errors,
        "invoiceNumber",
        &data.invoice_number,
        "invoice number is required",
        50,
    );
    if data.date_iso.is_empty() {
        errors.push(FieldError::new("dateISO", "date is required"));
    }

    check_party(&mut errors, "issuedFrom", &data.issued_from);
    check_party(&mut errors, "issuedTo", &data.issued_to);

    check_len(
        &mut errors,
        "project.project",
        &data.project.project,
        "project name is required",
        200,
    );
    check_len(
        &mut errors,
        "project.delivery",
        &data.project.delivery,
        "delivery details are required",
        200,
    );
    check_range(
        &mut errors,
        "project.ratePerSite",
        data.project.rate_per_site,
        0.0,
        1_000_000.0,
    );
    if data.project.total_sites < 1 || data.project.total_sites > 10_000 {
        errors.push(FieldError::new(
            "project.totalSites",
            "must be between 1 and 10000",
        ));
    }

    if data.items.is_empty() {
        errors.push(FieldError::new("items", "at least one item is required"));
    }
    for (idx, item) in data.items.iter().enumerate() {
        check_len(
            &mut errors,
            &format!("items[{}].description", idx),
            &item.description,
            "item description is required",
            200,
        );
        check_range(
            &mut errors,
            &format!("items[{}].qty", idx),
            item.qty,
            0.01,
            10_000.0,
        );
        check_range(
            &mut errors,
            &format!("items[{}].unitPrice", idx),
            item.unit_price,
            0.0,
            1_000_000.0,
        );
    }

    check_range(&mut errors, "advance", data.advance, 0.0, 10_000_000.0);
    check_range(&mut errors, "gstPercent", data.gst_percent, 0.0, 100.0);
    check_range(&mut errors, "tdsPercent", data.tds_percent, 0.0, 100.0);

    check_len(
        &mut errors,
        "payment.bankName",
        &data.payment.bank_name,
        "bank name is required",
        100,
    );
    check_len(
        &mut errors,
        "payment.accountName",
        &data.payment.account_name,
        "account name is required",
        100,
    );
    if !account_number_re().is_match(&data.payment.account_number) {
        errors.push(FieldError::new(
            "payment.accountNumber",
            "account number must be 9-18 digits",
        ));
    }
    if !ifsc_re().is_match(&data.payment.ifsc) {
        errors.push(FieldError::new("payment.ifsc", "invalid IFSC code format"));
    }
    check_len(
        &mut errors,
        "payment.branch",
        &data.payment.branch,
        "branch name is required",
        100,
    );

    check_len(
        &mut errors,
        "terms",
        &data.terms,
        "terms and conditions are required",
        1000,
    );

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{InvoiceItem, Party, PaymentInfo, ProjectDetails};

    fn valid_data() -> InvoiceData {
        InvoiceData {
            company_name: "Enkonix Software Services Pvt Ltd".to_string(),
            service_title: "Service Invoice".to_string(),
            invoice_number: "INV-001".to_string(),
            date_iso: "2024-04-01".to_string(),
            status: None,
            issued_from: Party {
                name: "Enkonix".to_string(),
                address: "Bangalore".to_string(),
                gstin: Some("29ABCDE1234F1Z5".to_string()),
                pan: Some("ABCDE1234F".to_string()),
            },
            issued_to: Party {
                name: "Client".to_string(),
                address: "Pune".to_string(),
                gstin: None,
                pan: None,
            },
            project: ProjectDetails {
                project: "Rollout".to_string(),
                delivery: "Phase 1".to_string(),
                rate_per_site: 100.0,
                total_sites: 10,
            },
            items: vec![InvoiceItem {
                id: "1".to_string(),
                description: "Survey".to_string(),
                qty: 1.0,
                unit_price: 100.0,
            }],
            advance: 0.0,
            gst_percent: 18.0,
            tds_percent: 2.0,
            payment: PaymentInfo {
                bank_name: "HDFC Bank".to_string(),
                account_name: "Enkonix".to_string(),
                account_number: "501001234567".to_string(),
                ifsc: "HDFC0001234".to_string(),
                branch: "Marathahalli".to_string(),
            },
            terms: "Net 15.".to_string(),
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(validate(&valid_data()).is_ok());
    }

    #[test]
    fn gstin_format_is_enforced() {
        let mut data = valid_data();
        data.issued_from.gstin = Some("BADGSTIN".to_string());
        let errors = validate(&data).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "issuedFrom.gstin"));
    }

    #[test]
    fn empty_gstin_is_allowed() {
        let mut data = valid_data();
        data.issued_from.gstin = Some(String::new());
        assert!(validate(&data).is_ok());
    }

    #[test]
    fn ifsc_requires_zero_at_fifth_position() {
        let mut data = valid_data();
        data.payment.ifsc = "HDFC1001234".to_string();
        let errors = validate(&data).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "payment.ifsc"));
    }

    #[test]
    fn account_number_length_bounds() {
        let mut data = valid_data();
        data.payment.account_number = "12345678".to_string();
        assert!(validate(&data).is_err());
        data.payment.account_number = "123456789".to_string();
        assert!(validate(&data).is_ok());
    }

    #[test]
    fn item_errors_carry_their_index() {
        let mut data = valid_data();
        data.items.push(InvoiceItem {
            id: "2".to_string(),
            description: String::new(),
            qty: 0.0,
            unit_price: 10.0,
        });
        let errors = validate(&data).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "items[1].description"));
        assert!(errors.iter().any(|e| e.field == "items[1].qty"));
    }

    #[test]
    fn no_items_is_rejected() {
        let mut data = valid_data();
        data.items.clear();
        let errors = validate(&data).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "items"));
    }
}
