use std::sync::LazyLock;

use regex::Regex;

/// A UK postcode embedded in free text: one to four word characters, one or
/// two digits, an optional trailing letter, then the inward code of one digit
/// and two letters, with optional whitespace in between.
const POSTCODE_PATTERN: &str = r"\w{1,4}\d{1,2}\w?\s*\d\w{2}";
static POSTCODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(POSTCODE_PATTERN).expect("Invalid regex pattern"));

/// Find the first postcode-shaped substring of `address`.
///
/// Returns `None` when the address carries nothing postcode-shaped, so a
/// single malformed address never aborts a batch.
pub fn find_postcode(address: &str) -> Option<String> {
    POSTCODE_REGEX
        .find(address)
        .map(|found| found.as_str().to_string())
}
