use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use volby_model::{ResultTable, ScrapeError, ScrapeResult};

/// Fixed leading columns, followed by one column per party.
pub const FIXED_COLUMNS: [&str; 5] = [
    "code",
    "name",
    "registered_voters",
    "envelopes_issued",
    "valid_votes",
];

/// Write `table` as CSV to `path`, creating or truncating the file.
///
/// The file is closed on every return path. A failure part-way through
/// leaves whatever was already written in place.
pub fn write_csv(table: &ResultTable, path: &Path) -> ScrapeResult<()> {
    let file = File::create(path).map_err(|e| ScrapeError::io(path, e))?;
    write_to(table, file).map_err(|e| ScrapeError::io(path, e))?;

    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        parties = table.parties().len(),
        "Wrote CSV"
    );
    Ok(())
}

/// Write `table` as UTF-8 CSV to any sink: a header row, then one row per
/// municipality in assembly order. A party missing from a municipality's
/// page is written as `0`.
pub fn write_to<W: Write>(table: &ResultTable, sink: W) -> io::Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let parties = table.parties().names();
    let header = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(parties.iter().map(String::as_str));
    writer.write_record(header)?;

    for m in table.rows() {
        let mut record: Vec<String> = Vec::with_capacity(FIXED_COLUMNS.len() + parties.len());
        record.push(m.code.clone());
        record.push(m.name.clone());
        record.push(m.registered_voters.to_string());
        record.push(m.envelopes_issued.to_string());
        record.push(m.valid_votes.to_string());
        record.extend(parties.iter().map(|p| m.votes_for(p).to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
