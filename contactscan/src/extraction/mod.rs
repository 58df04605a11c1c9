//! Record extraction from recognized text.
//!
//! OCR output for one image is treated as a list of lines in which a contact
//! appears as a name line immediately followed by a line carrying the phone
//! number:
//!
//! ```text
//! Alice Fernandes
//! +91 98765 43210   <- rejected: the number must be contiguous
//! Bob
//! 9123456789        <- Record { name: "Bob", number: "9123456789" }
//! ```
//!
//! Once a line has been consumed as a number it is never reconsidered as a
//! name. A line whose successor carries no number is dropped and its
//! successor becomes the next name candidate.
//!
//! Extraction is a pure function of its input and never fails; text without
//! any valid pair simply yields an empty list.

mod phone;

pub use phone::{find_mobile_number, is_normalized_number};

use crate::models::Record;

/// Split recognized text into trimmed, non-empty lines.
pub fn split_lines(raw_text: &str) -> Vec<&str> {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Pair adjacent lines of `raw_text` into [`Record`]s.
pub fn extract(raw_text: &str) -> Vec<Record> {
    let lines = split_lines(raw_text);
    let mut records = Vec::new();

    let mut i = 0;
    while i + 1 < lines.len() {
        let name = lines[i];
        match find_mobile_number(lines[i + 1]) {
            Some(number) => {
                debug_assert!(is_normalized_number(number));
                records.push(Record::new(name, number));
                i += 2;
            }
            None => i += 1,
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_trims_and_drops_blanks() {
        let lines = split_lines("  Alice \n\n\t\n 9876543210\r\n   ");
        assert_eq!(lines, vec!["Alice", "9876543210"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("\n\n   \n").is_empty());
    }

    #[test]
    fn test_single_line() {
        assert!(extract("9876543210").is_empty());
        assert!(extract("Alice").is_empty());
    }

    #[test]
    fn test_simple_pair() {
        let records = extract("Alice\n9876543210");
        assert_eq!(records, vec![Record::new("Alice", "9876543210")]);
    }

    #[test]
    fn test_number_line_is_not_reused_as_name() {
        let records = extract("Alice\n9876543210\nBob\n9123456789");
        assert_eq!(
            records,
            vec![
                Record::new("Alice", "9876543210"),
                Record::new("Bob", "9123456789"),
            ]
        );
    }

    #[test]
    fn test_consecutive_numbers_pair_once() {
        // The second number is never the name of the third.
        let records = extract("Alice\n9876543210\n9123456789\n8123456789");
        assert_eq!(
            records,
            vec![
                Record::new("Alice", "9876543210"),
                Record::new("9123456789", "8123456789"),
            ]
        );
    }

    #[test]
    fn test_unmatched_line_becomes_next_name() {
        let records = extract("Header\nAlice\n9876543210");
        assert_eq!(records, vec![Record::new("Alice", "9876543210")]);
    }

    #[test]
    fn test_no_number_yields_nothing() {
        assert!(extract("Alice\nno number here").is_empty());
    }

    #[test]
    fn test_prefix_is_normalized() {
        let records = extract("Alice\n+91 9876543210");
        assert_eq!(records, vec![Record::new("Alice", "9876543210")]);
    }

    #[test]
    fn test_trunk_prefixed_number_is_found() {
        let records = extract("Alice\n09876543210");
        assert_eq!(records, vec![Record::new("Alice", "9876543210")]);
    }

    #[test]
    fn test_non_ascii_digits_never_form_a_number() {
        assert!(extract("Alice\n9२३४५६७८९०").is_empty());
        assert!(extract("Alice\n९८७६५४३२१०\nBob\n9123456789")
            .iter()
            .all(|r| is_normalized_number(&r.number)));
    }

    #[test]
    fn test_invalid_leading_digit_is_rejected() {
        assert!(extract("Alice\n5876543210").is_empty());
    }

    #[test]
    fn test_name_is_kept_verbatim() {
        let records = extract("  Dr. A. Sharma  \n  Cell 7012345678  ");
        assert_eq!(records, vec![Record::new("Dr. A. Sharma", "7012345678")]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let records = extract("Alice\n9876543210\nAlice\n9876543210");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "x\nAlice\n9876543210\ny\nBob\n+919123456789\nz";
        assert_eq!(extract(text), extract(text));
    }
}
