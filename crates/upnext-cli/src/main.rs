//! `upnext` CLI -- inspect an iCalendar feed and show the next meeting.
//!
//! ## Usage
//!
//! ```sh
//! # Summary line for the next meeting (stdin → stdout)
//! curl -s https://example.com/calendar.ics | upnext next
//!
//! # Include free / placeholder entries, print JSON
//! upnext next -i calendar.ics --include-free --json
//!
//! # Every parsed occurrence, in Berlin time
//! upnext --tz Europe/Berlin list -i calendar.ics
//!
//! # Raw events, parsed entries and the expansion log
//! upnext inspect -i calendar.ics --now 2025-12-15T09:00:00Z
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;
use upnext_engine::{format_summary_line, select_next, zone_from_name, FeedParser, NextMeeting};

#[derive(Parser)]
#[command(
    name = "upnext",
    version,
    about = "Show the next meeting from an iCalendar feed"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Local time zone (IANA or Windows name)
    #[arg(long, global = true, env = "UPNEXT_TZ", default_value = "UTC")]
    tz: String,

    /// Reference instant as RFC 3339 (defaults to the system clock)
    #[arg(long, global = true)]
    now: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the next meeting
    Next {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Consider entries marked free or placeholder
        #[arg(long)]
        include_free: bool,
        /// Print the meeting as JSON (`null` when there is none)
        #[arg(long)]
        json: bool,
    },
    /// Print every parsed occurrence
    List {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print raw events, parsed entries and the expansion log
    Inspect {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let zone = zone_from_name(&cli.tz).context("Unknown time zone for --tz")?;
    let now = reference_instant(cli.now.as_deref(), zone)?;
    let parser = FeedParser::new(now);
    tracing::debug!(%now, "reference instant");

    match cli.command {
        Commands::Next {
            input,
            include_free,
            json,
        } => {
            let text = read_input(input.as_deref())?;
            let occurrences = parser.parse(&text);
            let next = select_next(&occurrences, &now, !include_free);
            if let Some(next) = next {
                tracing::debug!(%next, "selected next meeting");
            }

            if json {
                let meeting = next.map(NextMeeting::from);
                let pretty = serde_json::to_string_pretty(&meeting)
                    .context("Failed to serialize next meeting")?;
                println!("{}", pretty);
            } else {
                println!("{}", format_summary_line(next, &now));
            }
        }
        Commands::List { input } => {
            let text = read_input(input.as_deref())?;
            for occurrence in parser.parse(&text) {
                let mut line = format!(
                    "{}  {}  {}",
                    occurrence.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    occurrence.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                    occurrence.title
                );
                if let Some(url) = &occurrence.meeting_url {
                    line.push_str("  ");
                    line.push_str(url.as_str());
                }
                println!("{}", line);
            }
        }
        Commands::Inspect { input } => {
            let text = read_input(input.as_deref())?;
            let inspection = upnext_engine::inspect::inspect_with(&parser, &text);

            println!("Raw VEVENTs: {}", inspection.raw_events.len());
            for (i, raw) in inspection.raw_events.iter().enumerate() {
                println!("--- VEVENT #{} ---", i + 1);
                println!("{}", raw);
                println!();
            }
            println!("Parsed entries: {}", inspection.entries.len());
            for entry in &inspection.entries {
                println!("{}", entry);
            }
            println!("Expansion log:");
            for line in &inspection.expansion_log {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `--now` parsed as RFC 3339, or the system clock, expressed in `zone`.
fn reference_instant(now: Option<&str>, zone: Tz) -> Result<DateTime<Tz>> {
    match now {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid --now value: {}", raw))?;
            Ok(parsed.with_timezone(&zone))
        }
        None => Ok(Utc::now().with_timezone(&zone)),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
