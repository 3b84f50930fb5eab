use thiserror::Error;
use volby_model::ResultTable;

/// A municipality whose summary figures contradict each other.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("{code} ({name}): {envelopes} envelopes issued but only {registered} registered voters")]
    EnvelopesExceedRegistered {
        code: String,
        name: String,
        registered: u64,
        envelopes: u64,
    },

    #[error("{code} ({name}): {valid} valid votes but only {envelopes} envelopes issued")]
    ValidExceedEnvelopes {
        code: String,
        name: String,
        envelopes: u64,
        valid: u64,
    },

    #[error("{code} ({name}): party votes sum to {sum}, valid votes are {valid}")]
    PartySumMismatch {
        code: String,
        name: String,
        valid: u64,
        sum: u64,
    },
}

/// Check `registered ≥ envelopes ≥ valid` and that party votes add up to
/// the valid votes, for every row.
///
/// Nothing here stops the export: violations are logged and returned.
pub fn check_consistency(table: &ResultTable) -> Vec<ConsistencyError> {
    let mut errors = Vec::new();

    for m in table.rows() {
        if m.envelopes_issued > m.registered_voters {
            errors.push(ConsistencyError::EnvelopesExceedRegistered {
                code: m.code.clone(),
                name: m.name.clone(),
                registered: m.registered_voters,
                envelopes: m.envelopes_issued,
            });
        }
        if m.valid_votes > m.envelopes_issued {
            errors.push(ConsistencyError::ValidExceedEnvelopes {
                code: m.code.clone(),
                name: m.name.clone(),
                envelopes: m.envelopes_issued,
                valid: m.valid_votes,
            });
        }
        let sum: u64 = m.votes_by_party.iter().map(|p| p.votes).sum();
        if sum != m.valid_votes {
            errors.push(ConsistencyError::PartySumMismatch {
                code: m.code.clone(),
                name: m.name.clone(),
                valid: m.valid_votes,
                sum,
            });
        }
    }

    for e in &errors {
        tracing::warn!("{e}");
    }

    errors
}
