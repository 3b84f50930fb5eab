use std::collections::HashSet;

use crate::municipality::{DetailResults, Municipality, MunicipalityLink};

/// Party names seen so far, in first-seen order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct PartyColumns {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl PartyColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `party` unless it is already known. Returns true if it was new.
    pub fn register(&mut self, party: &str) -> bool {
        if self.seen.contains(party) {
            return false;
        }
        self.seen.insert(party.to_string());
        self.order.push(party.to_string());
        true
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The accumulated output of a district scrape: one row per municipality
/// plus the union of party columns across all of them.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    parties: PartyColumns,
    rows: Vec<Municipality>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enrich `link` with its result page figures and append the row.
    ///
    /// Parties not seen in earlier rows are appended to the column set;
    /// rows assembled before them read 0 for the new column. Returns the
    /// number of party columns this row introduced.
    pub fn push(&mut self, link: MunicipalityLink, detail: DetailResults) -> usize {
        let mut added = 0;
        for p in &detail.parties {
            if self.parties.register(&p.party) {
                added += 1;
            }
        }
        self.rows.push(Municipality::from_parts(link, detail));
        added
    }

    pub fn parties(&self) -> &PartyColumns {
        &self.parties
    }

    pub fn rows(&self) -> &[Municipality] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
