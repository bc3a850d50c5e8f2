use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use fmetrics::{compute_aggregates, recent_events, Database, Event, EventStore, Interval};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const SALES_REPS: [&str; 4] = ["alice", "bob", "carol", "dave"];

/// Sales metrics store with minute/hour/day averages
#[derive(Parser, Debug)]
#[clap(name = "fmetrics")]
struct Cli {
    /// Database folder
    #[clap(long, env = "FMETRICS_PATH", default_value = ".fmetrics")]
    path: PathBuf,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write random sales spread over the last 7 days
    Seed {
        /// Number of events
        #[clap(default_value_t = 10_000)]
        n: usize,
    },

    /// Print bucket averages as JSON
    Query {
        /// minute, hour or day
        #[clap(value_parser = parse_interval)]
        interval: Interval,
    },

    /// Print the raw events of an interval's window as JSON
    Events {
        /// minute, hour or day
        #[clap(value_parser = parse_interval)]
        interval: Interval,
    },

    /// Read one JSON event per line from stdin
    Ingest,
}

fn parse_interval(s: &str) -> Result<Interval, String> {
    s.parse::<Interval>().map_err(|e| e.to_string())
}

fn seed(db: &Database, n: usize) -> fmetrics::Result<()> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let now = fmetrics::timestamp();
    let start = Instant::now();

    for idx in 0..n {
        // Spread over the widest lookback window (7 days)
        let age = TimeDelta::seconds(rng.gen_range(0..7 * 24 * 60 * 60));
        let sales_rep = SALES_REPS[idx % SALES_REPS.len()];
        let amount: f64 = rng.gen_range(10.0..500.0);

        db.write(now - age, sales_rep, (amount * 100.0).round() / 100.0)?;

        if idx % 100_000 == 0 {
            log::info!("ingested {idx}");
        }
    }

    db.persist()?;

    log::info!(
        "ingested {n} events in {:?}, ~{} stored",
        start.elapsed(),
        db.approximate_len()
    );

    Ok(())
}

fn ingest(db: &Database) -> fmetrics::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Event>(&line) {
            Ok(event) => {
                let event = db.insert_event(event)?;
                writeln!(stdout, "{}", to_json(&event))?;
            }
            Err(e) => {
                log::warn!("rejected event {line:?}: {e}");
                writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
            }
        }
    }

    db.persist()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

fn run(db: &Database, command: Commands) -> fmetrics::Result<()> {
    match command {
        Commands::Seed { n } => seed(db, n),
        Commands::Query { interval } => {
            let start = Instant::now();
            let buckets = compute_aggregates(db, Some(interval.as_str()))?;
            log::info!("aggregated {} buckets in {:?}", buckets.len(), start.elapsed());
            println!("{}", to_json(&buckets));
            Ok(())
        }
        Commands::Events { interval } => {
            let events = recent_events(db, interval)?;
            println!("{}", to_json(&events));
            Ok(())
        }
        Commands::Ingest => ingest(db),
    }
}

fn main() -> fmetrics::Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .filter_module("lsm_tree", log::LevelFilter::Warn)
        .filter_module("fjall", log::LevelFilter::Warn)
        .filter_module("fmetrics", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::debug!("opening {:?}", cli.path);

    let db = Database::builder()
        .manual_journal_persist(true)
        .open(&cli.path)?;

    run(&db, cli.command)
}
