use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use volby_acquire::{FetchConfig, HttpFetcher};
use volby_model::ScrapeError;
use volby_validate::HostPolicy;

#[derive(Parser)]
#[command(name = "volby")]
#[command(about = "Export parliamentary election results of one volby.cz district to CSV, one row per municipality")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// District page listing municipalities (e.g., "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=12&xnumnuts=7103")
    district_url: String,

    /// Output file, must end in .csv
    output_csv: String,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,

    /// HTTP request timeout in seconds (at least 1)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// HTTP User-Agent header
    #[arg(long)]
    user_agent: Option<String>,

    /// Accept district URLs on hosts other than volby.cz
    #[arg(long)]
    any_host: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn init_tracing(cli: &Cli) {
    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 +01:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr; stdout stays free.
    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    let hosts = if cli.any_host {
        HostPolicy::Any
    } else {
        HostPolicy::ElectionsSite
    };
    let args = volby_validate::validate_args(&[cli.district_url, cli.output_csv], hosts)?;

    let mut config = FetchConfig {
        timeout: Duration::from_secs(cli.timeout),
        ..FetchConfig::default()
    };
    if let Some(user_agent) = cli.user_agent {
        config.user_agent = user_agent;
    }
    let fetcher = HttpFetcher::new(&config)?;

    let table = volby_acquire::scrape_district(&fetcher, &args.url)
        .await
        .context("Failed to scrape district")?;

    let issues = volby_validate::check_consistency(&table);
    if !issues.is_empty() {
        tracing::warn!(
            count = issues.len(),
            "Scraped figures are inconsistent; writing them unchanged"
        );
    }

    volby_export::write_csv(&table, &args.output)?;
    tracing::info!(path = %args.output.display(), "Done");

    Ok(())
}

/// Exit status per failure kind. Clap itself exits with 2 on a wrong
/// argument count.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ScrapeError>() {
        Some(ScrapeError::InvalidArgument(_)) => 2,
        Some(ScrapeError::Network { .. }) => 3,
        Some(ScrapeError::Parse { .. }) => 4,
        Some(ScrapeError::Io { .. }) => 5,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_two_positionals() {
        assert!(Cli::try_parse_from(["volby", "https://volby.cz/ps32"]).is_err());
        assert!(Cli::try_parse_from(["volby", "https://volby.cz/ps32", "a.csv", "b.csv"]).is_err());

        let cli = Cli::try_parse_from(["volby", "https://volby.cz/ps32", "a.csv"]).unwrap();
        assert_eq!(cli.output_csv, "a.csv");
        assert_eq!(cli.timeout, 30);
        assert!(!cli.any_host);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let args = ["volby", "--timeout", "0", "https://volby.cz/ps32", "a.csv"];
        assert!(Cli::try_parse_from(args).is_err());

        let cli = Cli::try_parse_from(["volby", "--timeout", "1", "https://volby.cz/ps32", "a.csv"]).unwrap();
        assert_eq!(cli.timeout, 1);
    }

    #[tokio::test]
    async fn test_malformed_url_fails_before_fetching() {
        let cli = Cli::try_parse_from(["volby", "not-a-url", "out.csv"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[tokio::test]
    async fn test_bad_output_name_fails_before_fetching() {
        let cli = Cli::try_parse_from(["volby", "https://volby.cz/ps32", "out.txt"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_sees_through_context() {
        let err = anyhow::Error::new(ScrapeError::parse("https://volby.cz/x", "no party results found"))
            .context("Failed to scrape district");
        assert_eq!(exit_code(&err), 4);
    }
}
