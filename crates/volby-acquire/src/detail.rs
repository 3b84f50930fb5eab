use scraper::{ElementRef, Html, Selector};
use url::Url;
use volby_model::{DetailResults, PartyVotes, ScrapeError, ScrapeResult};

use crate::normalize;

/// A summary figure at the top of a municipality result page.
struct Figure {
    /// Value of the `headers` attribute on the figure's `<td>`.
    header: &'static str,
    /// Row label used by page variants without `headers` attributes.
    label: &'static str,
    name: &'static str,
}

const REGISTERED: Figure = Figure {
    header: "sa2",
    label: "Voliči v seznamu",
    name: "registered voters",
};

const ENVELOPES: Figure = Figure {
    header: "sa3",
    label: "Vydané obálky",
    name: "envelopes issued",
};

const VALID: Figure = Figure {
    header: "sa6",
    label: "Platné hlasy",
    name: "valid votes",
};

/// Parse a municipality result page.
///
/// The three summary figures come from the `sa2`/`sa3`/`sa6` cells, or
/// failing that from the row labelled with the figure's Czech name. Party
/// rows are the `<tr>`s holding a `td.overflow_name`; their vote count is
/// the third cell.
pub fn parse_detail(html: &str, page_url: &Url) -> ScrapeResult<DetailResults> {
    let document = Html::parse_document(html);

    let registered_voters = summary_figure(&document, &REGISTERED, page_url)?;
    let envelopes_issued = summary_figure(&document, &ENVELOPES, page_url)?;
    let valid_votes = summary_figure(&document, &VALID, page_url)?;
    let parties = party_votes(&document, page_url)?;

    Ok(DetailResults {
        registered_voters,
        envelopes_issued,
        valid_votes,
        parties,
    })
}

fn summary_figure(document: &Html, figure: &Figure, page_url: &Url) -> ScrapeResult<u64> {
    let cell_sel = Selector::parse(&format!(r#"td[headers~="{}"]"#, figure.header))
        .expect("valid selector");

    let by_header = document.select(&cell_sel).next().map(normalize::cell_text);
    if let Some(value) = by_header.as_deref().and_then(normalize::parse_count) {
        return Ok(value);
    }

    let by_label = labelled_value(document, figure.label);
    if let Some(value) = by_label.as_deref().and_then(normalize::parse_count) {
        tracing::debug!(figure = figure.name, value, "Read figure from labelled row");
        return Ok(value);
    }

    let message = match by_header.or(by_label) {
        Some(text) => format!("{} is not a number: {text:?}", figure.name),
        None => format!("missing {}", figure.name),
    };
    Err(ScrapeError::parse(page_url, message))
}

/// Second cell of the first table row whose first cell contains `label`.
fn labelled_value(document: &Html, label: &str) -> Option<String> {
    let row_sel = Selector::parse("table tr").expect("valid selector");
    let cell_sel = Selector::parse("td, th").expect("valid selector");

    document.select(&row_sel).find_map(|row| {
        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        if cells.len() < 2 || !normalize::cell_text(cells[0]).contains(label) {
            return None;
        }
        Some(normalize::cell_text(cells[1]))
    })
}

fn party_votes(document: &Html, page_url: &Url) -> ScrapeResult<Vec<PartyVotes>> {
    let row_sel = Selector::parse("table tr").expect("valid selector");
    let name_sel = Selector::parse("td.overflow_name").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");

    let mut parties: Vec<PartyVotes> = Vec::new();

    for row in document.select(&row_sel) {
        let Some(name_td) = row.select(&name_sel).next() else {
            continue;
        };
        let party = normalize::cell_text(name_td);
        if party.is_empty() {
            continue;
        }

        let tds: Vec<ElementRef> = row.select(&td_sel).collect();
        if tds.len() < 3 {
            tracing::debug!(party = %party, cols = tds.len(), "Skipping party row with < 3 columns");
            continue;
        }

        if parties.iter().any(|p| p.party == party) {
            continue;
        }

        let text = normalize::cell_text(tds[2]);
        let votes = normalize::parse_count(&text).ok_or_else(|| {
            ScrapeError::parse(page_url, format!("vote count for {party:?} is not a number: {text:?}"))
        })?;

        parties.push(PartyVotes { party, votes });
    }

    if parties.is_empty() {
        return Err(ScrapeError::parse(page_url, "no party results found"));
    }

    Ok(parties)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.volby.cz/pls/ps2017nss/ps311?xjazyk=CZ&xkraj=12&xobec=589268&xvyber=7103").unwrap()
    }

    const RESULT_PAGE: &str = r#"
        <html><body>
        <h3>Obec: Bedihošť</h3>
        <table id="ps311_t1">
          <tr><th id="sa1">Okrsky</th><th id="sa2">Voliči v seznamu</th><th id="sa3">Vydané obálky</th>
              <th id="sa4">Volební účast v %</th><th id="sa5">Odevzdané obálky</th><th id="sa6">Platné hlasy</th></tr>
          <tr>
            <td class="cislo" headers="sa1 sb1">1</td>
            <td class="cislo" headers="sa2">834</td>
            <td class="cislo" headers="sa3">527</td>
            <td class="cislo" headers="sa4">63,19</td>
            <td class="cislo" headers="sa5">527</td>
            <td class="cislo" headers="sa6">524</td>
          </tr>
        </table>
        <div class="t2_470">
        <table class="table">
          <tr><th>Strana číslo</th><th>název</th><th>celkem</th><th>v %</th></tr>
          <tr><td class="cislo">1</td><td class="overflow_name">Občanská demokratická strana</td><td class="cislo">51</td><td class="cislo">9,73</td></tr>
          <tr><td class="cislo">2</td><td class="overflow_name">Řád národa - Vlastenecká unie</td><td class="cislo">0</td><td class="cislo">0,00</td></tr>
        </table>
        </div>
        <div class="t2_470">
        <table class="table">
          <tr><th>Strana číslo</th><th>název</th><th>celkem</th><th>v %</th></tr>
          <tr><td class="cislo">21</td><td class="overflow_name">ANO 2011</td><td class="cislo">1&nbsp;171</td><td class="cislo">32,63</td></tr>
          <tr><td class="hidden_td">-</td><td class="hidden_td">-</td><td class="hidden_td">-</td><td class="hidden_td">-</td></tr>
        </table>
        </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_result_page() {
        let detail = parse_detail(RESULT_PAGE, &page_url()).unwrap();

        assert_eq!(detail.registered_voters, 834);
        assert_eq!(detail.envelopes_issued, 527);
        assert_eq!(detail.valid_votes, 524);

        let names: Vec<&str> = detail.parties.iter().map(|p| p.party.as_str()).collect();
        assert_eq!(
            names,
            ["Občanská demokratická strana", "Řád národa - Vlastenecká unie", "ANO 2011"]
        );
        assert_eq!(detail.parties[1].votes, 0);
        assert_eq!(detail.parties[2].votes, 1171);
    }

    #[test]
    fn test_summary_from_labelled_rows() {
        let html = r#"
        <table>
          <tr><th>Voliči v seznamu</th><td>1 200</td></tr>
          <tr><th>Vydané obálky</th><td>700</td></tr>
          <tr><th>Platné hlasy</th><td>690</td></tr>
        </table>
        <table>
          <tr><td>1</td><td class="overflow_name">Zelení</td><td>12</td></tr>
        </table>
        "#;
        let detail = parse_detail(html, &page_url()).unwrap();

        assert_eq!(detail.registered_voters, 1200);
        assert_eq!(detail.envelopes_issued, 700);
        assert_eq!(detail.valid_votes, 690);
        assert_eq!(detail.parties, vec![PartyVotes { party: "Zelení".into(), votes: 12 }]);
    }

    #[test]
    fn test_zero_figure_is_not_missing() {
        let html = r#"
        <table><tr>
          <td headers="sa2">10</td><td headers="sa3">0</td><td headers="sa6">0</td>
        </tr></table>
        <table><tr><td>1</td><td class="overflow_name">ODS</td><td>0</td></tr></table>
        "#;
        let detail = parse_detail(html, &page_url()).unwrap();
        assert_eq!(detail.envelopes_issued, 0);
        assert_eq!(detail.valid_votes, 0);
    }

    #[test]
    fn test_repeated_party_keeps_first_value() {
        let html = r#"
        <table><tr><td headers="sa2">3</td><td headers="sa3">2</td><td headers="sa6">2</td></tr></table>
        <table>
          <tr><td>1</td><td class="overflow_name">ODS</td><td>2</td></tr>
          <tr><td>1</td><td class="overflow_name">ODS</td><td>7</td></tr>
        </table>
        "#;
        let detail = parse_detail(html, &page_url()).unwrap();
        assert_eq!(detail.parties.len(), 1);
        assert_eq!(detail.parties[0].votes, 2);
    }

    #[test]
    fn test_missing_figure_is_parse_error() {
        let html = r#"
        <table><tr><td headers="sa2">834</td><td headers="sa3">527</td></tr></table>
        <table><tr><td>1</td><td class="overflow_name">ODS</td><td>51</td></tr></table>
        "#;
        let err = parse_detail(html, &page_url()).unwrap_err();
        match err {
            ScrapeError::Parse { message, .. } => assert_eq!(message, "missing valid votes"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_figure_is_parse_error() {
        let html = r#"
        <table><tr><td headers="sa2">n/a</td><td headers="sa3">527</td><td headers="sa6">524</td></tr></table>
        <table><tr><td>1</td><td class="overflow_name">ODS</td><td>51</td></tr></table>
        "#;
        let err = parse_detail(html, &page_url()).unwrap_err();
        assert!(err.to_string().contains("registered voters is not a number"), "{err}");
    }

    #[test]
    fn test_non_numeric_vote_count_is_parse_error() {
        let html = r#"
        <table><tr><td headers="sa2">3</td><td headers="sa3">2</td><td headers="sa6">2</td></tr></table>
        <table><tr><td>1</td><td class="overflow_name">ODS</td><td>?</td></tr></table>
        "#;
        let err = parse_detail(html, &page_url()).unwrap_err();
        assert!(matches!(err, ScrapeError::Parse { .. }));
    }

    #[test]
    fn test_page_without_parties_is_parse_error() {
        let html = r#"<table><tr><td headers="sa2">3</td><td headers="sa3">2</td><td headers="sa6">2</td></tr></table>"#;
        let err = parse_detail(html, &page_url()).unwrap_err();
        assert!(err.to_string().contains("no party results"));
    }
}
