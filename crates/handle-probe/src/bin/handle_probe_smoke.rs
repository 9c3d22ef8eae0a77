use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use handle_probe::{probe_outcome, ProbeReport};

fn parse_args() -> bool {
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            other => tracing::warn!(arg = other, "ignoring unknown argument"),
        }
    }
    json
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let json = parse_args();
    let outcome = probe_outcome();
    tracing::info!(outcome = outcome.code(), detail = %outcome, "invalid handle probe finished");

    let exit_code = outcome.exit_code();
    let report = ProbeReport::new(outcome);
    if json {
        let rendered = serde_json::to_string(&report).context("serialize probe report")?;
        println!("{}", rendered);
    } else {
        println!("{}", report.summary());
    }

    std::process::exit(exit_code);
}
