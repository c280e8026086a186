use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "neighborhood", version, about = "Lay out neighborhood markers on the globe")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the marker layout as JSON.
    Markers {
        /// JSON array of person records.
        #[arg(long)]
        people: PathBuf,
        /// JSON object of airport records.
        #[arg(long)]
        airports: PathBuf,
        /// Seconds since mount, to apply the blink scale.
        #[arg(long)]
        elapsed: Option<f64>,
    },
    /// Print airport groups and who ended up where.
    Groups {
        #[arg(long)]
        people: PathBuf,
        #[arg(long)]
        airports: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<(), String> {
    let payload = match cli.command {
        Command::Markers {
            people,
            airports,
            elapsed,
        } => {
            let people = tools::load_people(&people)?;
            let airports = tools::load_airports(&airports)?;
            let layout = tools::markers(&people, &airports, elapsed)?;
            warn_unmatched(&layout.unmatched);
            serde_json::to_string_pretty(&layout)
        }
        Command::Groups { people, airports } => {
            let people = tools::load_people(&people)?;
            let airports = tools::load_airports(&airports)?;
            let report = tools::groups(&people, &airports)?;
            warn_unmatched(&report.unmatched);
            serde_json::to_string_pretty(&report)
        }
    }
    .map_err(|e| format!("json: {e}"))?;

    println!("{payload}");
    Ok(())
}

fn warn_unmatched(codes: &[String]) {
    if !codes.is_empty() {
        warn!(codes = ?codes, "airport codes with no reference record");
    }
}
