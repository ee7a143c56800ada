//! latentid - identification search over an enrolled template archive.
//!
//! Uses the built-in grid matcher as the scoring algorithm, so the
//! archives it understands are ones written in the grid template
//! format (see `latentid-matcher`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use latentid_enrolldb::{provision_reference_db, EnrollDb};
use latentid_matcher::GridMatcher;
use latentid_search::{SearchConfig, Searcher};
use tracing::info;

#[derive(Parser)]
#[command(name = "latentid")]
#[command(about = "Fingerprint identification over a template archive")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy an archive + manifest pair into a database directory
    Provision {
        /// Source archive file
        #[arg(long)]
        archive: PathBuf,

        /// Source manifest file
        #[arg(long)]
        manifest: PathBuf,

        /// Destination database directory (must exist)
        #[arg(long)]
        dest: PathBuf,
    },

    /// Load a database and print record / cache counts
    Info {
        /// Database directory holding `archive` and `manifest`
        #[arg(long)]
        db: PathBuf,

        /// Memory cache budget in bytes
        #[arg(long, default_value_t = 1 << 30)]
        max_memory: u64,
    },

    /// Rank a probe template against every enrolled record
    Search {
        /// Database directory holding `archive` and `manifest`
        #[arg(long)]
        db: PathBuf,

        /// File holding the serialized probe template
        #[arg(long)]
        probe: PathBuf,

        /// Maximum candidates to return
        #[arg(long, default_value_t = 10)]
        max_candidates: u16,

        /// Memory cache budget in bytes
        #[arg(long, default_value_t = 1 << 30)]
        max_memory: u64,

        /// JSON search config (fusion weights, decision threshold)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Scan worker threads (1 = sequential)
        #[arg(long, default_value_t = 1)]
        workers: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match Args::parse().command {
        Command::Provision {
            archive,
            manifest,
            dest,
        } => {
            provision_reference_db(&archive, &manifest, &dest)
                .context("provisioning reference database")?;
            println!("provisioned {}", dest.display());
        }
        Command::Info { db, max_memory } => {
            let db = load_db(&db, max_memory)?;
            println!("records: {}", db.len(false));
            println!("cached:  {}", db.len(true));
        }
        Command::Search {
            db,
            probe,
            max_candidates,
            max_memory,
            config,
            workers,
        } => {
            let cfg = match config {
                Some(path) => SearchConfig::from_file(&path)?,
                None => SearchConfig::default(),
            };
            let db = load_db(&db, max_memory)?;
            let probe_bytes = fs::read(&probe)
                .with_context(|| format!("reading probe {}", probe.display()))?;

            let matcher = GridMatcher::new();
            let searcher = Searcher::new(&db, &matcher, cfg);
            let outcome = if workers > 1 {
                searcher.par_search(&probe_bytes, max_candidates, workers)?
            } else {
                searcher.search(&probe_bytes, max_candidates)?
            };
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}

fn load_db(dir: &Path, max_memory: u64) -> Result<EnrollDb> {
    let mut db = EnrollDb::new(dir);
    db.load(max_memory, &GridMatcher::new())
        .with_context(|| format!("loading database {}", dir.display()))?;
    info!(
        records = db.len(false),
        cached = db.len(true),
        "database loaded"
    );
    Ok(db)
}
