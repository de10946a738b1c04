//! Field extraction rules and the first-valid-match selection logic.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod tax_id;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A single extraction rule.
///
/// `group` selects which capture of `pattern` becomes the candidate value
/// (0 is the whole match). Candidates are offered to `validator` in the
/// order they occur in the text; the first accepted one is stored, after
/// running it through `normalizer` when present.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub group: usize,
    pub validator: fn(&str) -> bool,
    pub normalizer: Option<fn(&str) -> String>,
}

/// The built-in rule set, applied in declaration order.
pub fn built_in_rules() -> Vec<FieldRule> {
    vec![
        FieldRule {
            name: "tax_id",
            pattern: &patterns::TAX_ID,
            group: 0,
            validator: tax_id::validate_tax_id,
            normalizer: None,
        },
        FieldRule {
            name: "invoice_date",
            pattern: &patterns::INVOICE_DATE,
            group: 0,
            validator: dates::validate_date,
            normalizer: None,
        },
        FieldRule {
            name: "total_amount",
            pattern: &patterns::TOTAL_AMOUNT,
            group: 1,
            validator: amounts::validate_amount,
            normalizer: Some(amounts::normalize_amount),
        },
    ]
}

/// Extraction output: every declared field name is present, mapped to its
/// value or an explicit absence marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields {
    fields: BTreeMap<String, Option<String>>,
}

impl ExtractedFields {
    /// The stored value for a field, if one was found.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }

    /// Whether the field was declared (found or not).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over declared fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

/// Run every rule against the text and collect the results.
///
/// For each rule, matches are scanned in the order they appear and the
/// first candidate accepted by the validator wins. A rule with no accepted
/// candidate still contributes its name, mapped to `None`.
pub fn extract_fields(text: &str, rules: &[FieldRule]) -> ExtractedFields {
    let mut fields = BTreeMap::new();

    for rule in rules {
        let mut value = None;
        for caps in rule.pattern.captures_iter(text) {
            let candidate = match caps.get(rule.group) {
                Some(matched) => matched.as_str(),
                None => continue,
            };
            if (rule.validator)(candidate) {
                value = Some(match rule.normalizer {
                    Some(normalize) => normalize(candidate),
                    None => candidate.to_string(),
                });
                break;
            }
        }
        debug!(field = rule.name, found = value.is_some(), "rule evaluated");
        fields.insert(rule.name.to_string(), value);
    }

    ExtractedFields { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> ExtractedFields {
        extract_fields(text, &built_in_rules())
    }

    #[test]
    fn test_extracts_all_three_fields() {
        let text = "GSTIN: 27AAPFU0939F1Z3\nInvoice date: 05/03/2024\nTotal: ₹1,234.56";
        let fields = extract(text);

        assert_eq!(fields.get("tax_id"), Some("27AAPFU0939F1Z3"));
        assert_eq!(fields.get("invoice_date"), Some("05/03/2024"));
        assert_eq!(fields.get("total_amount"), Some("1234.56"));
    }

    #[test]
    fn test_every_field_present_on_empty_text() {
        let fields = extract("");

        assert_eq!(fields.len(), 3);
        assert!(fields.contains("tax_id"));
        assert!(fields.contains("invoice_date"));
        assert!(fields.contains("total_amount"));
        assert_eq!(fields.get("tax_id"), None);
        assert_eq!(fields.get("invoice_date"), None);
        assert_eq!(fields.get("total_amount"), None);
    }

    #[test]
    fn test_first_valid_candidate_wins() {
        // The first total fails validation (zero); the second is stored.
        let text = "Grand Total: 0.00\nTotal: 250.00";
        let fields = extract(text);

        assert_eq!(fields.get("total_amount"), Some("250.00"));
    }

    #[test]
    fn test_zero_only_total_is_absent() {
        let fields = extract("Grand Total: 0.00");

        assert!(fields.contains("total_amount"));
        assert_eq!(fields.get("total_amount"), None);
    }

    #[test]
    fn test_invalid_checksum_is_skipped_for_later_valid_token() {
        let text = "Draft GSTIN 27AAPFU0939F1Z9\nFinal GSTIN 27AAPFU0939F1Z3";
        let fields = extract(text);

        assert_eq!(fields.get("tax_id"), Some("27AAPFU0939F1Z3"));
    }

    #[test]
    fn test_amount_is_normalized_on_store() {
        let fields = extract("Amount payable: ₹12,34,567.89");

        assert_eq!(fields.get("total_amount"), Some("1234567.89"));
    }

    #[test]
    fn test_impossible_calendar_date_is_kept() {
        let fields = extract("Dated 31/02/2024");

        assert_eq!(fields.get("invoice_date"), Some("31/02/2024"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "Total: 10.00 Total: 20.00 Total: 30.00";
        assert_eq!(extract(text), extract(text));
        assert_eq!(extract(text).get("total_amount"), Some("10.00"));
    }

    #[test]
    fn test_serializes_with_explicit_nulls() {
        let fields = extract("Total: 99.00");
        let json = serde_json::to_value(&fields).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "tax_id": null,
                "invoice_date": null,
                "total_amount": "99.00",
            })
        );
    }
}
