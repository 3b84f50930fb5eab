use url::Url;

/// One municipality row from the district index page, before its
/// result page has been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalityLink {
    /// Municipality code as printed on the index page (e.g., "589268").
    pub code: String,
    pub name: String,
    /// Absolute URL of the municipality's result page.
    pub detail_url: Url,
}

/// Vote count for one party on one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyVotes {
    pub party: String,
    pub votes: u64,
}

/// Figures extracted from a single municipality result page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailResults {
    pub registered_voters: u64,
    pub envelopes_issued: u64,
    pub valid_votes: u64,
    /// Party results in page order. Party names are unique.
    pub parties: Vec<PartyVotes>,
}

/// A fully enriched municipality, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Municipality {
    pub code: String,
    pub name: String,
    pub detail_url: Url,
    pub registered_voters: u64,
    pub envelopes_issued: u64,
    pub valid_votes: u64,
    pub votes_by_party: Vec<PartyVotes>,
}

impl Municipality {
    /// Merge an index row with the figures parsed from its result page.
    pub fn from_parts(link: MunicipalityLink, detail: DetailResults) -> Self {
        Self {
            code: link.code,
            name: link.name,
            detail_url: link.detail_url,
            registered_voters: detail.registered_voters,
            envelopes_issued: detail.envelopes_issued,
            valid_votes: detail.valid_votes,
            votes_by_party: detail.parties,
        }
    }

    /// Votes for `party`, or 0 when the party was not on this page.
    pub fn votes_for(&self, party: &str) -> u64 {
        self.votes_by_party
            .iter()
            .find(|p| p.party == party)
            .map(|p| p.votes)
            .unwrap_or(0)
    }
}
