//! `sqlsage` — natural-language SQL assistant.
//!
//! Connects to a SQLite database, reconciles the remote model's training
//! state against a fingerprint of the live schema, then loops: question in,
//! SQL out, results as a text table.
//!
//! # Usage
//!
//! ```
//! sqlsage --db company.db --api-key $SQLSAGE_API_KEY
//! sqlsage --config sqlsage.toml --status
//! sqlsage --clear
//! ```

mod settings;
mod table;

use std::{io::Write as _, path::PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use settings::{Overrides, Settings};
use sqlsage_client::{GeneratorConfig, HttpGenerator};
use sqlsage_core::{
  examples::ExampleSet,
  fingerprint::fingerprint,
  generator::SqlGenerator,
  record::needs_training,
  snapshot::SchemaSnapshot,
  state::StateStore,
  trainer::{Trainer, TrainingOutcome},
};
use sqlsage_db_sqlite::Database;
use sqlsage_state_file::FileStateStore;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sqlsage", about = "Natural-language SQL assistant")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, default_value = "sqlsage.toml", value_name = "FILE")]
  config: PathBuf,

  /// SQLite database to introspect and query.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Training-state record file.
  #[arg(long)]
  state: Option<PathBuf>,

  /// Training-examples file (TOML).
  #[arg(long)]
  examples: Option<PathBuf>,

  /// Base URL of the inference service.
  #[arg(long, env = "SQLSAGE_URL")]
  url: Option<String>,

  /// API key for the inference service.
  #[arg(long, env = "SQLSAGE_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Hosted model name.
  #[arg(long)]
  model: Option<String>,

  /// Print training status and exit.
  #[arg(long)]
  status: bool,

  /// Clear the persisted training state and exit.
  #[arg(long)]
  clear: bool,

  /// Retrain even if the stored fingerprint matches.
  #[arg(long)]
  retrain: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let mut settings = Settings::load(&args.config)?;
  settings.apply(Overrides {
    db:       args.db,
    state:    args.state,
    examples: args.examples,
    url:      args.url,
    api_key:  args.api_key,
    model:    args.model,
  });

  let store = FileStateStore::new(&settings.state_path);

  if args.clear {
    store.clear().await.context("clearing training state")?;
    println!("Training state cleared; next run will retrain.");
    return Ok(());
  }

  let db = Database::open(&settings.db_path)
    .await
    .with_context(|| format!("opening database {:?}", settings.db_path))?;
  db.ping().await.context("database connection check failed")?;
  info!(db = %settings.db_path.display(), "database connected");

  // Degraded mode: an unreadable catalog means training status is unknown.
  // The session continues without retraining rather than aborting.
  let snapshot = match db.schema_snapshot().await {
    Ok(snapshot) => Some(snapshot),
    Err(e) => {
      warn!(error = %e, "schema introspection failed, training status unknown");
      None
    }
  };

  if args.status {
    return print_status(&store, snapshot.as_ref()).await;
  }

  let generator = HttpGenerator::new(GeneratorConfig {
    base_url: settings.service_url.clone(),
    api_key:  settings.api_key.clone(),
    model:    settings.model.clone(),
  })?;
  let trainer = Trainer::new(generator, store);

  match &snapshot {
    Some(snapshot) => {
      let examples = load_examples(&settings.examples_path)?;
      let outcome = trainer
        .ensure_trained(snapshot, &examples, args.retrain)
        .await
        .context("training failed")?;
      match outcome {
        TrainingOutcome::Fresh => println!("Using previously trained model."),
        TrainingOutcome::Trained { succeeded, failed } => println!(
          "Model trained: {succeeded} examples accepted, {failed} skipped."
        ),
      }
    }
    None => {
      println!("Schema unavailable; continuing with the model as-is.");
    }
  }

  repl(&db, trainer.generator()).await
}

// ─── Status ───────────────────────────────────────────────────────────────────

async fn print_status(
  store: &FileStateStore,
  snapshot: Option<&SchemaSnapshot>,
) -> Result<()> {
  let record = store
    .load()
    .await
    .context("reading training state")?;

  match &record {
    None => println!("Not trained (no record on disk)."),
    Some(rec) => {
      println!("Trained:       {}", rec.trained);
      println!("Examples:      {}", rec.example_count);
      println!("Last trained:  {}", rec.last_trained_at.to_rfc3339());
      println!("Fingerprint:   {}", rec.fingerprint);
    }
  }

  match snapshot {
    None => println!("Current schema: unavailable."),
    Some(snapshot) => {
      let current = fingerprint(snapshot);
      println!("Current schema: {current}");
      if needs_training(record.as_ref(), &current) {
        println!("Retraining required on next run.");
      } else {
        println!("Training is up to date.");
      }
    }
  }
  Ok(())
}

// ─── Training examples ────────────────────────────────────────────────────────

/// Read the examples file. A missing file is not fatal — training proceeds
/// with schema-derived input only.
fn load_examples(path: &std::path::Path) -> Result<ExampleSet> {
  if !path.exists() {
    warn!(path = %path.display(), "training examples file not found");
    return Ok(ExampleSet::default());
  }
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading examples file {path:?}"))?;
  toml::from_str(&raw).with_context(|| format!("parsing examples file {path:?}"))
}

// ─── Question loop ────────────────────────────────────────────────────────────

async fn repl<G: SqlGenerator>(db: &Database, generator: &G) -> Result<()> {
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  println!("Ask a question (blank line or \"quit\" to exit).");

  loop {
    print!("? ");
    std::io::stdout().flush()?;
    let Some(line) = lines.next_line().await? else { break };
    let question = line.trim();
    if question.is_empty() || question == "quit" || question == "exit" {
      break;
    }

    let sql = match generator.generate_sql(question).await {
      Ok(Some(sql)) => sql,
      Ok(None) => {
        println!("The model produced no SQL for that question.");
        continue;
      }
      Err(e) => {
        eprintln!("SQL generation failed: {e}");
        continue;
      }
    };
    println!("\n{sql}\n");

    print!("Run it? [Y/n] ");
    std::io::stdout().flush()?;
    let Some(answer) = lines.next_line().await? else { break };
    if !matches!(answer.trim(), "" | "y" | "Y" | "yes") {
      continue;
    }

    match db.run_query(&sql).await {
      Ok(out) if out.is_empty() => println!("No rows returned."),
      Ok(out) => {
        print!("{}", table::render(&out));
        println!("({} rows)", out.rows.len());
      }
      Err(e) => eprintln!("Query failed: {e}"),
    }
  }

  Ok(())
}
