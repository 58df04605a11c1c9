use pretty_assertions::assert_eq;

use contactscan::extraction::{extract, find_mobile_number, split_lines};
use contactscan::models::Record;

#[test]
fn test_contact_sheet_is_paired_in_order() {
    let text = "\
Contacts
Alice Fernandes
9876543210
Bob Mathew
+91 9123456789
Chitra
Office: 080 2345 6789
Deepak
91-7012345678
";

    assert_eq!(
        extract(text),
        vec![
            Record::new("Alice Fernandes", "9876543210"),
            Record::new("Bob Mathew", "9123456789"),
            Record::new("Deepak", "7012345678"),
        ]
    );
}

#[test]
fn test_number_line_is_never_reused_as_name() {
    let text = "Alice\n9876543210\n9123456789\nBob\n8123456789";
    assert_eq!(
        extract(text),
        vec![
            Record::new("Alice", "9876543210"),
            Record::new("Bob", "8123456789"),
        ]
    );
}

#[test]
fn test_ocr_noise_between_pairs_is_skipped() {
    let text = "  \n| Alice |\n\n  9876543210  \n~~~\n@@\nBob\nmobile 6000000001 (home)\n";
    let records = extract(text);

    assert_eq!(
        records,
        vec![
            Record::new("| Alice |", "9876543210"),
            Record::new("Bob", "6000000001"),
        ]
    );
}

#[test]
fn test_landline_is_rejected() {
    assert_eq!(find_mobile_number("5123456789"), None);
    assert!(extract("Alice\n5123456789\nBob\n123").is_empty());
}

#[test]
fn test_number_inside_longer_digit_run_is_found() {
    assert_eq!(find_mobile_number("98765432101234"), Some("9876543210"));
    assert_eq!(
        extract("Alice\n09876543210"),
        vec![Record::new("Alice", "9876543210")]
    );
}

#[test]
fn test_devanagari_digits_are_not_numbers() {
    let text = "Alice\n9२३४५६७८९०\nBob\n9123456789";
    assert_eq!(extract(text), vec![Record::new("Bob", "9123456789")]);
}

#[test]
fn test_split_lines_drops_blank_lines() {
    assert_eq!(split_lines("a\n\n  \n b \r\nc"), vec!["a", "b", "c"]);
}

#[test]
fn test_every_number_is_ten_digits_starting_six_to_nine() {
    let text = "A\n+919876543210\nB\n6123456789\nC\n91 8123456789\nD\n7999999999";
    for record in extract(text) {
        assert_eq!(record.number.len(), 10);
        assert!(record.number.chars().all(|c| c.is_ascii_digit()));
        assert!(matches!(record.number.as_bytes()[0], b'6'..=b'9'));
    }
}

#[test]
fn test_clipboard_lines() {
    let lines: Vec<String> = extract("Alice\n9876543210\nBob\n9123456789")
        .iter()
        .map(Record::to_clipboard_line)
        .collect();
    assert_eq!(lines.join("\n"), "Alice - 9876543210\nBob - 9123456789");
}
