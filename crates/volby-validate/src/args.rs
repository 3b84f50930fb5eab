use std::path::PathBuf;

use url::Url;
use volby_model::{ScrapeError, ScrapeResult};

/// Host serving the election results.
pub const ELECTIONS_HOST: &str = "volby.cz";

/// Which hosts a district URL may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPolicy {
    /// `volby.cz` or one of its subdomains.
    ElectionsSite,
    Any,
}

/// The two command-line inputs, checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArgs {
    pub url: Url,
    pub output: PathBuf,
}

/// Validate a raw argument vector holding exactly `<district_url> <output_csv>`
/// (program name already stripped).
pub fn validate_args(args: &[String], hosts: HostPolicy) -> ScrapeResult<ValidatedArgs> {
    match args {
        [url, output] => validate_pair(url, output, hosts),
        _ => Err(ScrapeError::InvalidArgument(format!(
            "expected 2 arguments <district_url> <output_csv>, got {}",
            args.len()
        ))),
    }
}

/// Validate the district URL and the output file name. Touches neither the
/// network nor the file system.
pub fn validate_pair(url: &str, output: &str, hosts: HostPolicy) -> ScrapeResult<ValidatedArgs> {
    let url = url.trim();
    let output = output.trim();

    let parsed = Url::parse(url)
        .map_err(|e| ScrapeError::InvalidArgument(format!("{url:?} is not a valid URL: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScrapeError::InvalidArgument(format!(
            "{url:?} must start with http:// or https://"
        )));
    }

    let host = parsed.host_str().unwrap_or_default();
    if host.is_empty() {
        return Err(ScrapeError::InvalidArgument(format!("{url:?} has no host")));
    }
    if hosts == HostPolicy::ElectionsSite && !is_elections_host(host) {
        return Err(ScrapeError::InvalidArgument(format!(
            "{url:?} must point to {ELECTIONS_HOST} (use --any-host for other hosts)"
        )));
    }

    if !output.to_lowercase().ends_with(".csv") || output.len() <= ".csv".len() {
        return Err(ScrapeError::InvalidArgument(format!(
            "{output:?} must be a .csv file name"
        )));
    }

    Ok(ValidatedArgs {
        url: parsed,
        output: PathBuf::from(output),
    })
}

fn is_elections_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == ELECTIONS_HOST || host.ends_with(&format!(".{ELECTIONS_HOST}"))
}
