//! GST tax identification number validation.

/// Validate a GST identification number using the checksum algorithm.
///
/// The number is 15 characters where the last digit is a checksum.
/// Characters are valued 0-9 for digits and 10-35 for letters, weighted
/// alternately 1 and 2; the weighted sum modulo 11 modulo 10 must equal
/// the final digit.
pub fn validate_tax_id(tax_id: &str) -> bool {
    let chars: Vec<char> = tax_id.chars().collect();
    if chars.len() != 15 {
        return false;
    }

    let mut sum = 0u32;
    for (i, ch) in chars[..14].iter().enumerate() {
        let value = match char_value(*ch) {
            Some(value) => value,
            None => return false,
        };
        let weight = if i % 2 == 0 { 1 } else { 2 };
        sum += value * weight;
    }

    let checksum = (sum % 11) % 10;
    chars[14].to_digit(10) == Some(checksum)
}

/// Character value in the checksum alphabet: digits as-is, letters A=10..Z=35.
fn char_value(ch: char) -> Option<u32> {
    if let Some(digit) = ch.to_digit(10) {
        Some(digit)
    } else if ch.is_ascii_alphabetic() {
        Some(ch.to_ascii_uppercase() as u32 - 55)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tax_id_valid() {
        assert!(validate_tax_id("27AAPFU0939F1Z3")); // Known valid number
    }

    #[test]
    fn test_validate_tax_id_invalid_checksum() {
        assert!(!validate_tax_id("27AAPFU0939F1Z9"));
        assert!(!validate_tax_id("07AAPFU0939F1Z3")); // State digit changed
    }

    #[test]
    fn test_validate_tax_id_wrong_length() {
        assert!(!validate_tax_id("27AAPFU0939F1Z")); // Too short
        assert!(!validate_tax_id("27AAPFU0939F1Z33")); // Too long
        assert!(!validate_tax_id(""));
    }

    #[test]
    fn test_validate_tax_id_case_insensitive() {
        assert!(validate_tax_id("27aapfu0939f1z3"));
    }

    #[test]
    fn test_validate_tax_id_rejects_symbols() {
        assert!(!validate_tax_id("27AAPFU0939F1-3"));
        assert!(!validate_tax_id("27 APFU0939F1Z3"));
    }
}
