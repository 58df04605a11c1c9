use once_cell::sync::Lazy;
use regex::Regex;

/// Regional mobile number, optionally behind a `+91` / `91` country code
/// (with an optional `-` or space). The subscriber part is captured as
/// `number`. The search is unanchored and leftmost, so a trunk `0` or a stray
/// digit glued on by OCR does not hide a number. Digits are ASCII only.
static MOBILE_NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?91[-\s]?)?(?P<number>[6-9][0-9]{9})")
        .expect("mobile number pattern is valid")
});

/// Find the first regional mobile number in `line`, returned without its
/// country code.
pub fn find_mobile_number(line: &str) -> Option<&str> {
    MOBILE_NUMBER_RE
        .captures(line)
        .and_then(|caps| caps.name("number"))
        .map(|m| m.as_str())
}

/// True when `candidate` is already a normalized number.
pub fn is_normalized_number(candidate: &str) -> bool {
    candidate.len() == 10
        && candidate.bytes().all(|b| b.is_ascii_digit())
        && matches!(candidate.as_bytes()[0], b'6'..=b'9')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_number() {
        assert_eq!(find_mobile_number("9876543210"), Some("9876543210"));
    }

    #[test]
    fn test_country_code_variants_are_stripped() {
        assert_eq!(find_mobile_number("+91 9876543210"), Some("9876543210"));
        assert_eq!(find_mobile_number("+91-9876543210"), Some("9876543210"));
        assert_eq!(find_mobile_number("+919876543210"), Some("9876543210"));
        assert_eq!(find_mobile_number("919876543210"), Some("9876543210"));
        assert_eq!(find_mobile_number("91 9876543210"), Some("9876543210"));
    }

    #[test]
    fn test_number_embedded_in_text() {
        assert_eq!(
            find_mobile_number("Mobile 7012345678 office"),
            Some("7012345678")
        );
        assert_eq!(find_mobile_number("Ph.6000000000"), Some("6000000000"));
    }

    #[test]
    fn test_number_starting_with_91_without_prefix() {
        assert_eq!(find_mobile_number("9198765432"), Some("9198765432"));
    }

    #[test]
    fn test_invalid_leading_digit_rejected() {
        assert_eq!(find_mobile_number("5876543210"), None);
        assert_eq!(find_mobile_number("0987654321"), None);
    }

    #[test]
    fn test_too_short_rejected() {
        assert_eq!(find_mobile_number("987654321"), None);
        assert_eq!(find_mobile_number("98765 43210"), None);
    }

    #[test]
    fn test_longer_digit_run_yields_leftmost_number() {
        assert_eq!(find_mobile_number("09876543210"), Some("9876543210"));
        assert_eq!(find_mobile_number("98765432101"), Some("9876543210"));
        assert_eq!(find_mobile_number("59876543210"), Some("9876543210"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert_eq!(find_mobile_number("9२३४५६७८९०"), None);
        assert_eq!(find_mobile_number("९८७६५४३२१०"), None);
        assert_eq!(find_mobile_number("२ 9876543210"), Some("9876543210"));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(find_mobile_number("no number here"), None);
        assert_eq!(find_mobile_number(""), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            find_mobile_number("9876543210 or 9123456789"),
            Some("9876543210")
        );
    }

    #[test]
    fn test_is_normalized_number() {
        assert!(is_normalized_number("9876543210"));
        assert!(is_normalized_number("6000000000"));
        assert!(!is_normalized_number("5876543210"));
        assert!(!is_normalized_number("+919876543210"));
        assert!(!is_normalized_number("98765 43210"));
    }
}
