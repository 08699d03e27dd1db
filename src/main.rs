mod link_gatherer;
mod report;
mod resolver;
mod site_tracer;

use std::process::ExitCode;
use std::time::Duration;

use link_gatherer::Page;
use site_tracer::SiteTracer;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Parser, Debug)]
#[command(version, about = "Recursively checks every link reachable from a page")]
pub struct Cli {
    /// The page to start checking from
    url: Url,
    /// Log every fetch attempt
    #[arg(short, long)]
    verbose: bool,
    /// Only follow links on the seed's origin inside the seed's directory
    #[arg(long)]
    same_origin: bool,
    /// Maximum number of pages fetched at once
    #[arg(short, long, default_value_t = 16, value_parser = clap::value_parser!(u16).range(1..))]
    concurrency: u16,
    /// Per-request timeout in seconds; requests never time out when unset
    #[arg(short, long)]
    timeout: Option<u64>,
    /// Overrides the level picked by --verbose (e.g. trace, warn)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_logging(args: &Cli) {
    let level = match (&args.log_level, args.verbose) {
        (Some(level), _) => level.as_str(),
        (None, true) => "debug",
        (None, false) => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(format!("link_walker={}", level))
        .compact()
        .init();
}

fn build_client(timeout: Option<u64>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    };
    init_logging(&args);

    let client = match build_client(args.timeout) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!("Could not build HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let st = SiteTracer {
        link_getter: Page::new(client),
        worker_pool_size: args.concurrency,
        same_origin: args.same_origin,
    };

    let report = st.trace(&args.url, cancel).await;
    if report.cancelled {
        tracing::warn!("Interrupted: {}", report);
        return ExitCode::from(130);
    }
    tracing::info!("Done checking {}: {}", report.seed, report);
    ExitCode::SUCCESS
}
