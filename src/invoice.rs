use crate::error::BandPressError;
use serde::{Deserialize, Serialize};

/// The invoice record handed over by the form/validation collaborator.
///
/// Fields arrive pre-validated; the engine only derives totals from them.
/// The serde names match the JSON payload the form layer emits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub company_name: String,
    pub service_title: String,
    pub invoice_number: String,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    pub issued_from: Party,
    pub issued_to: Party,
    pub project: ProjectDetails,
    pub items: Vec<InvoiceItem>,
    /// Advance already paid, deducted from the gross before tax.
    pub advance: f64,
    pub gst_percent: f64,
    pub tds_percent: f64,
    pub payment: PaymentInfo,
    pub terms: String,
}

impl InvoiceData {
    pub fn from_json(json: &str) -> Result<Self, BandPressError> {
        serde_json::from_str(json).map_err(|e| BandPressError::InvalidData(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    pub qty: f64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub project: String,
    pub delivery: String,
    pub rate_per_site: f64,
    pub total_sites: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Rejected,
    Completed,
    Pending,
    Approved,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Rejected => "Rejected",
            InvoiceStatus::Completed => "Completed",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Approved => "Approved",
        }
    }

    /// Conventional asset name of the status badge image.
    pub fn badge_asset(&self) -> &'static str {
        match self {
            InvoiceStatus::Rejected => "status-rejected",
            InvoiceStatus::Completed => "status-completed",
            InvoiceStatus::Pending => "status-pending",
            InvoiceStatus::Approved => "status-approved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub gross: f64,
    pub net_subtotal: f64,
    pub gst: f64,
    pub tds: f64,
    pub total_payable: f64,
}

/// Derived totals. GST and TDS round to whole rupees; the gross and the
/// subtotal keep whatever precision the line items carry.
pub fn calc_totals(data: &InvoiceData) -> Totals {
    let gross: f64 = data.items.iter().map(|it| it.qty * it.unit_price).sum();
    let net_subtotal = (gross - data.advance).max(0.0);
    let gst = (net_subtotal * data.gst_percent / 100.0).round();
    let tds = (net_subtotal * data.tds_percent / 100.0).round();
    let total_payable = (net_subtotal + gst - tds).max(0.0);
    Totals {
        gross,
        net_subtotal,
        gst,
        tds,
        total_payable,
    }
}

/// Indian-rupee formatting with lakh/crore digit grouping, e.g.
/// `₹5,40,000` or `₹5,40,000.50`. Non-finite amounts render as zero.
pub fn format_inr(amount: f64, with_decimals: bool) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let negative = amount < 0.0;
    let abs = amount.abs();
    let (int_part, frac_part) = if with_decimals {
        let cents = (abs * 100.0).round() as u64;
        (cents / 100, Some(cents % 100))
    } else {
        (abs.round() as u64, None)
    };

    let digits = int_part.to_string();
    let mut grouped = String::new();
    // Last three digits form one group; the rest group in pairs.
    if digits.len() <= 3 {
        grouped.push_str(&digits);
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let head_bytes = head.as_bytes();
        let lead = head_bytes.len() % 2;
        if lead == 1 {
            grouped.push(head_bytes[0] as char);
        }
        for pair in head_bytes[lead..].chunks(2) {
            if !grouped.is_empty() {
                grouped.push(',');
            }
            grouped.push(pair[0] as char);
            grouped.push(pair[1] as char);
        }
        grouped.push(',');
        grouped.push_str(tail);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push_str(&format!(".{:02}", frac));
    }
    out
}

/// `dd/MM/yyyy` from an ISO `yyyy-mm-dd...` date string; empty input or a
/// malformed prefix renders as an empty string, matching the preview.
pub fn format_date_dmy(date_iso: &str) -> String {
    let bytes = date_iso.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return String::new();
    }
    let year = &date_iso[0..4];
    let month = &date_iso[5..7];
    let day = &date_iso[8..10];
    if !year.bytes().all(|b| b.is_ascii_digit())
        || !month.bytes().all(|b| b.is_ascii_digit())
        || !day.bytes().all(|b| b.is_ascii_digit())
    {
        return String::new();
    }
    format!("{}/{}/{}", day, month, year)
}
