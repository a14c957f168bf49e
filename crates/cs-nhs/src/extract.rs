use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::QueryError;

// The results pages carry no stable classes, but every per-facility field
// element has an `id` containing one of these markers.
static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[id*="orgname"]"#).expect("Invalid selector"));
static ADDRESS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[id*="address"]"#).expect("Invalid selector"));
static PHONE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[id*="phone"]"#).expect("Invalid selector"));

/// One facility entry as scraped from a results page, before geocoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub address: String,
    pub phone_number: String,
}

fn select_texts(html: &Html, selector: &Selector) -> Vec<String> {
    html.select(selector)
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// Pull every facility entry out of a parsed results page.
///
/// The page lists each field in its own element sequence; the sequences are
/// aligned by document position, so their lengths must agree. A page where
/// they do not (some entry missing a field) fails the whole query instead of
/// pairing fields of different facilities.
pub fn extract_entries(html: &Html) -> Result<Vec<RawEntry>, QueryError> {
    let names = select_texts(html, &NAME_SELECTOR);
    let addresses = select_texts(html, &ADDRESS_SELECTOR);
    let phones = select_texts(html, &PHONE_SELECTOR);
    if names.len() != addresses.len() || names.len() != phones.len() {
        return Err(QueryError::FieldCountMismatch {
            names: names.len(),
            addresses: addresses.len(),
            phones: phones.len(),
        });
    }
    debug!(entries = names.len(), "extracted facility entries");
    Ok(names
        .into_iter()
        .zip(addresses)
        .zip(phones)
        .map(|((name, address), phone_number)| RawEntry {
            name,
            address,
            phone_number,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <ol>
            <li>
              <h2 id="orgname_1">Royal Devon Hospital</h2>
              <p id="address_1">Barrack Road,
                 Exeter EX2 5DW</p>
              <p id="phone_1">01392 411611</p>
            </li>
            <li>
              <h2 id="orgname_2">Torbay Hospital</h2>
              <p id="address_2">Newton Road, Torquay TQ2 7AA</p>
              <p id="phone_2">0300 456 8000</p>
            </li>
          </ol>
        </body></html>"#;

    #[test]
    fn extracts_aligned_entries() {
        let html = Html::parse_document(RESULTS_PAGE);

        let entries = extract_entries(&html).unwrap();

        assert_eq!(
            entries,
            vec![
                RawEntry {
                    name: "Royal Devon Hospital".to_string(),
                    address: "Barrack Road, Exeter EX2 5DW".to_string(),
                    phone_number: "01392 411611".to_string(),
                },
                RawEntry {
                    name: "Torbay Hospital".to_string(),
                    address: "Newton Road, Torquay TQ2 7AA".to_string(),
                    phone_number: "0300 456 8000".to_string(),
                },
            ]
        );
    }

    #[test]
    fn collapses_whitespace_in_nested_markup() {
        let html = Html::parse_document(
            r#"<div id="orgname_1"><span>Royal Devon</span>
               <span>Hospital</span></div>
               <p id="address_1">x EX2 5DW</p>
               <p id="phone_1">01392 411611</p>"#,
        );

        let entries = extract_entries(&html).unwrap();

        assert_eq!(entries[0].name, "Royal Devon Hospital");
    }

    #[test]
    fn empty_page_yields_no_entries() {
        let html = Html::parse_document("<html><body><p>No results</p></body></html>");

        let entries = extract_entries(&html).unwrap();

        assert!(entries.is_empty());
    }

    #[test]
    fn mismatched_field_counts_fail_fast() {
        // Three names but only two addresses: pairing name[2] with nothing
        // must be an error, not a silent shift.
        let html = Html::parse_document(
            r#"
            <h2 id="orgname_1">A</h2><p id="address_1">a</p><p id="phone_1">1</p>
            <h2 id="orgname_2">B</h2><p id="address_2">b</p><p id="phone_2">2</p>
            <h2 id="orgname_3">C</h2><p id="phone_3">3</p>"#,
        );

        let result = extract_entries(&html);

        assert!(matches!(
            result,
            Err(QueryError::FieldCountMismatch {
                names: 3,
                addresses: 2,
                phones: 3,
            })
        ));
    }
}
