//! Common regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // GST tax identification number (15 characters, checksum-verified elsewhere)
    pub static ref TAX_ID: Regex = Regex::new(
        r"\b\d{2}[A-Z]{5}\d{4}[A-Z]\dZ[A-Z\d]\b"
    ).unwrap();

    // Day-first invoice dates with - or / separators, years 2020-2029
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"\b(?:0[1-9]|[12][0-9]|3[01])[-/](?:0[1-9]|1[012])[-/]202[0-9]\b"
    ).unwrap();

    // Labelled totals; group 1 captures the amount with optional currency sign
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:total|grand total|amount payable)\s*:?\s*([₹$]?[\d,]+\.\d{2})"
    ).unwrap();
}
