use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;
use volby_model::{MunicipalityLink, ScrapeError, ScrapeResult};

use crate::normalize;

/// Parse a district page into its municipality rows, in page order.
///
/// A municipality row is a `<tr>` holding an `<a>` whose href carries an
/// `xobec=` parameter and whose text is the numeric municipality code.
/// The name is the row's second cell. Links are resolved against
/// `page_url`.
pub fn parse_index(html: &str, page_url: &Url) -> ScrapeResult<Vec<MunicipalityLink>> {
    let document = Html::parse_document(html);

    let link_sel = Selector::parse("a[href]").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");
    let xobec = Regex::new(r"[?&]xobec=\d+").expect("valid regex");

    let mut links: Vec<MunicipalityLink> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();

    for a in document.select(&link_sel) {
        let href = a.value().attr("href").unwrap_or_default();
        if !xobec.is_match(href) {
            continue;
        }

        let code = normalize::cell_text(a);
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            // The "X" column links to the same page
            continue;
        }

        let Some(tr) = (*a)
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "tr")
        else {
            tracing::debug!(href, "Skipping municipality link outside a table row");
            continue;
        };

        let tds: Vec<ElementRef> = tr.select(&td_sel).collect();
        if tds.len() < 2 {
            tracing::debug!(code = %code, cols = tds.len(), "Skipping row with < 2 columns");
            continue;
        }

        let name = normalize::cell_text(tds[1]);
        let detail_url = page_url
            .join(href)
            .map_err(|e| ScrapeError::parse(page_url, format!("bad municipality link {href:?}: {e}")))?;

        let link = MunicipalityLink { code, name, detail_url };
        match position.get(&link.code) {
            Some(&i) => links[i] = link,
            None => {
                position.insert(link.code.clone(), links.len());
                links.push(link);
            }
        }
    }

    if links.is_empty() {
        return Err(ScrapeError::parse(
            page_url,
            "no municipalities found; is this a district page?",
        ));
    }

    Ok(links)
}
