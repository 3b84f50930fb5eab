use url::Url;
use volby_model::{ResultTable, ScrapeResult};

use crate::detail;
use crate::fetch::PageFetcher;
use crate::index;

/// Scrape a whole district: the index page once, then every municipality
/// result page in index order, one request at a time.
///
/// Stops at the first failure; nothing collected so far is returned.
pub async fn scrape_district<F: PageFetcher>(fetcher: &F, district_url: &Url) -> ScrapeResult<ResultTable> {
    tracing::info!(url = %district_url, "Downloading district page");
    let html = fetcher.fetch(district_url).await?;
    tracing::info!(bytes = html.len(), "Received HTML");

    let links = index::parse_index(&html, district_url)?;
    let total = links.len();
    tracing::info!(municipalities = total, "Found municipalities");

    let mut table = ResultTable::new();
    for (i, link) in links.into_iter().enumerate() {
        tracing::info!("[{}/{}] Scraping: {} ({})", i + 1, total, link.name, link.code);

        let html = fetcher.fetch(&link.detail_url).await?;
        let results = detail::parse_detail(&html, &link.detail_url)?;
        let code = link.code.clone();

        let added = table.push(link, results);
        if added > 0 && i > 0 {
            tracing::warn!(
                code = %code,
                added,
                "Municipality lists parties absent from earlier pages; appended as new columns"
            );
        }
    }

    tracing::info!(
        municipalities = table.len(),
        parties = table.parties().len(),
        "Scraped district"
    );
    Ok(table)
}
