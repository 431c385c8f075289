//! CLI entry point for local sanity checks.
//!
//! # Responsibility
//! - Verify `memlane_core` linkage.
//! - Render the feed views and a review pass over a snapshot file without a
//!   hosted store.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use memlane_core::{
    CardSelection, Clock, FeedView, FixedClock, InMemoryRecordStore, MemoryFeed, ReviewQueue,
    ScatterLayout, StorePath, SystemClock,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "memlane", version, about = "Memlane core probe")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Probe,
    /// Print a feed view of a `memories` snapshot file.
    Render {
        #[arg(long, env = "MEMLANE_SNAPSHOT")]
        snapshot: PathBuf,
        #[arg(long, value_enum, default_value_t = ViewArg::All)]
        view: ViewArg,
        /// Calendar date used as "today" (`YYYY-MM-DD`); defaults to local date.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Seed for a reproducible card layout.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Walk today's queue, rejecting the listed ids and keeping the rest.
    Review {
        #[arg(long, env = "MEMLANE_SNAPSHOT")]
        snapshot: PathBuf,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, value_delimiter = ',')]
        reject: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    All,
    Today,
}

impl From<ViewArg> for FeedView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::All => FeedView::All,
            ViewArg::Today => FeedView::Today,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Command::Probe) {
        Command::Probe => {
            println!("memlane_core ping={}", memlane_core::ping());
            println!("memlane_core version={}", memlane_core::core_version());
            Ok(())
        }
        Command::Render {
            snapshot,
            view,
            date,
            seed,
        } => render(&snapshot, view.into(), date, seed),
        Command::Review {
            snapshot,
            date,
            reject,
        } => review(&snapshot, date, &reject),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn render(
    snapshot: &Path,
    view: FeedView,
    date: Option<NaiveDate>,
    seed: Option<u64>,
) -> Result<(), String> {
    let store = load_store(snapshot)?;
    let mut feed = MemoryFeed::with_clock(view, clock_for(date));
    feed.attach(&store).map_err(|err| err.to_string())?;
    let records = feed.records();
    if records.is_empty() {
        println!("No memories yet.");
        return Ok(());
    }

    if view == FeedView::Today {
        for record in &records {
            println!("{}  {}  {}", record.id, record.display_timestamp(), record.topic);
        }
        return Ok(());
    }

    let layout = match seed {
        Some(seed) => ScatterLayout::compute_with_rng(
            records.iter().map(|record| record.id.as_str()),
            &mut StdRng::seed_from_u64(seed),
        ),
        None => ScatterLayout::for_records(&records),
    };
    let selection = CardSelection::new();
    for (index, record) in records.iter().enumerate() {
        let placement = layout.placement(index, &record.id, &selection);
        println!(
            "{:>7.1}  x={:>6.1} rot={:>5.1}  {}  {}",
            placement.top,
            placement.x_offset,
            placement.rotation_degrees,
            record.display_timestamp(),
            record.topic
        );
    }
    Ok(())
}

fn review(snapshot: &Path, date: Option<NaiveDate>, reject: &[String]) -> Result<(), String> {
    let store = load_store(snapshot)?;
    let mut feed = MemoryFeed::with_clock(FeedView::Today, clock_for(date));
    feed.attach(&store).map_err(|err| err.to_string())?;
    let mut queue = ReviewQueue::enter(&store, feed.records());
    feed.detach();

    while let Some(id) = queue.current_record().map(|record| record.id.clone()) {
        if reject.contains(&id) {
            let outcome = queue.reject(&id).map_err(|err| err.to_string())?;
            let note = if outcome.is_deleted() { "" } else { " (delete failed)" };
            println!("reject {id}{note}");
        } else {
            queue.advance().map_err(|err| err.to_string())?;
            println!("keep   {id}");
        }
    }

    let summary = queue.summary();
    println!(
        "kept={} rejected={} total={}",
        summary.kept, summary.rejected, summary.total
    );
    Ok(())
}

fn load_store(path: &Path) -> Result<InMemoryRecordStore, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read `{}`: {err}", path.display()))?;
    let value = serde_json::from_str::<serde_json::Value>(&raw)
        .map_err(|err| format!("`{}` is not valid JSON: {err}", path.display()))?;
    let store = InMemoryRecordStore::new();
    store
        .set(&StorePath::memories(), value)
        .map_err(|err| err.to_string())?;
    Ok(store)
}

fn clock_for(date: Option<NaiveDate>) -> Arc<dyn Clock> {
    match date {
        Some(date) => Arc::new(FixedClock(date)),
        None => Arc::new(FixedClock(SystemClock.today())),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, ViewArg};
    use clap::Parser;

    #[test]
    fn no_subcommand_defaults_to_probe() {
        let cli = Cli::try_parse_from(["memlane"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn render_parses_view_date_and_seed() {
        let cli = Cli::try_parse_from([
            "memlane",
            "render",
            "--snapshot",
            "memories.json",
            "--view",
            "today",
            "--date",
            "2025-02-16",
            "--seed",
            "9",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Render {
                view, date, seed, ..
            }) => {
                assert_eq!(view, ViewArg::Today);
                assert_eq!(date.map(|d| d.to_string()).as_deref(), Some("2025-02-16"));
                assert_eq!(seed, Some(9));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn review_splits_reject_list() {
        let cli = Cli::try_parse_from([
            "memlane", "review", "--snapshot", "m.json", "--reject", "a,b",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Review { reject, .. }) => assert_eq!(reject, vec!["a", "b"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
