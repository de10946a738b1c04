//! Invoice date matching.

/// Accept any candidate produced by the date pattern.
///
/// Dates are matched by shape only. Impossible calendar dates such as
/// `31/02/2024` pass through unchanged; downstream consumers decide how
/// strictly to interpret them.
pub fn validate_date(_candidate: &str) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::super::patterns::INVOICE_DATE;
    use super::*;

    #[test]
    fn test_date_pattern_matches_day_first_dates() {
        assert!(INVOICE_DATE.is_match("05/03/2024"));
        assert!(INVOICE_DATE.is_match("31-12-2029"));
        assert!(INVOICE_DATE.is_match("01/01/2020"));
    }

    #[test]
    fn test_date_pattern_allows_impossible_calendar_dates() {
        assert!(INVOICE_DATE.is_match("31/02/2024"));
        assert!(validate_date("31/02/2024"));
    }

    #[test]
    fn test_date_pattern_rejects_out_of_shape_dates() {
        assert!(!INVOICE_DATE.is_match("32/01/2024")); // No such day
        assert!(!INVOICE_DATE.is_match("01/13/2024")); // No such month
        assert!(!INVOICE_DATE.is_match("00/05/2024"));
        assert!(!INVOICE_DATE.is_match("05.03.2024")); // Wrong separator
    }

    #[test]
    fn test_date_pattern_rejects_out_of_window_years() {
        assert!(!INVOICE_DATE.is_match("01/01/2019"));
        assert!(!INVOICE_DATE.is_match("01/01/2030"));
    }

    #[test]
    fn test_date_pattern_requires_word_boundaries() {
        assert!(!INVOICE_DATE.is_match("105/03/20240"));
        assert!(INVOICE_DATE.is_match("Date: 05/03/2024."));
    }
}
