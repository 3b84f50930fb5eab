use scraper::ElementRef;
use unicode_normalization::UnicodeNormalization;

/// Normalize Unicode text to NFC form and collapse whitespace runs.
///
/// Municipality and party names on volby.cz carry Czech diacritics
/// (č, ř, š, ž, ů) and are split across text nodes padded with
/// newlines and non-breaking spaces.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of an element: text nodes trimmed, joined with a single
/// space, then normalized.
pub fn cell_text(element: ElementRef) -> String {
    let joined = element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_text(&joined)
}

/// Parse a vote count such as `"1 234"`, `"1\u{a0}234"` or `"12,345"`.
///
/// Whitespace (including no-break spaces), `,`, `.`, `'` and narrow
/// no-break spaces are accepted as thousands separators only: every group
/// after the first must be exactly three digits, so `"9,73"` is rejected.
/// Returns `None` for empty or non-numeric text.
pub fn parse_count(text: &str) -> Option<u64> {
    let groups: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '\'' | '\u{202f}'))
        .filter(|g| !g.is_empty())
        .collect();

    let (first, rest) = groups.split_first()?;
    if !groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }
    if !rest.is_empty() && (first.len() > 3 || rest.iter().any(|g| g.len() != 3)) {
        return None;
    }

    groups.concat().parse().ok()
}
