//! `tierheim`: command-line front end for the shelter admission registry.
//!
//! # Usage
//!
//! ```sh
//! tierheim enclosure add --id 5 --name "Cattery" --capacity 4
//! tierheim admit --name Milo --species Cat --age 3 --enclosure 5
//! tierheim list
//! tierheim --json enclosure list
//! ```
//!
//! Refused admissions, validation failures and unknown enclosures exit with
//! status 2; storage and configuration failures exit with status 1.

mod commands;
mod settings;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tierheim_core::{AdmissionRegistry, animal::Sex};
use tierheim_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tierheim", version, about = "Animal shelter admission registry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tierheim.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `store_path` from the configuration.
  #[arg(long, env = "TIERHEIM_STORE")]
  store: Option<PathBuf>,

  /// Print results as JSON.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Admit a new animal.
  Admit(AdmitArgs),
  /// List all animals, most recently admitted first.
  List,
  /// Show one animal.
  Show { id: i64 },
  /// Remove an animal. Removing an unknown id succeeds.
  Remove { id: i64 },
  /// Count animals, in total or in one enclosure.
  Count {
    #[arg(long)]
    enclosure: Option<i64>,
  },
  /// Manage and inspect enclosures.
  #[command(subcommand)]
  Enclosure(EnclosureCommand),
}

#[derive(Args, Debug)]
struct AdmitArgs {
  #[arg(long)]
  name:         String,
  #[arg(long)]
  species:      String,
  /// Birth date (YYYY-MM-DD). Takes precedence over --age.
  #[arg(long)]
  birth_date:   Option<NaiveDate>,
  /// Age in whole years. Without --birth-date, the birth date is recorded
  /// as today minus this many years.
  #[arg(long)]
  age:          Option<u32>,
  #[arg(long)]
  enclosure:    Option<i64>,
  /// M, F or U.
  #[arg(long, default_value = "U")]
  sex:          Sex,
  #[arg(long)]
  color:        Option<String>,
  #[arg(long)]
  health_note:  Option<String>,
  /// Arrival date (YYYY-MM-DD).
  #[arg(long)]
  arrival_date: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum EnclosureCommand {
  /// Register an enclosure.
  Add {
    #[arg(long)]
    id:       i64,
    #[arg(long)]
    name:     String,
    #[arg(long)]
    capacity: u32,
  },
  /// List enclosures with their occupancy.
  List,
  /// Show capacity and occupancy of one enclosure.
  Check { id: i64 },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  match run(Cli::parse()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      match err.downcast_ref::<tierheim_core::Error>() {
        Some(refusal) if refusal.is_domain() => eprintln!("error: {refusal}"),
        _ => eprintln!("error: {err:#}"),
      }
      ExitCode::from(exit_status(&err))
    }
  }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
  let settings = Settings::load(&cli.config)?;
  let store_path = cli.store.clone().unwrap_or(settings.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let registry = AdmissionRegistry::new(store);

  commands::run(&registry, cli.command, cli.json).await
}

/// 2 for caller-recoverable registry errors, 1 for everything else.
fn exit_status(err: &anyhow::Error) -> u8 {
  match err.downcast_ref::<tierheim_core::Error>() {
    Some(e) if e.is_domain() => 2,
    _ => 1,
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn admit_parses_dates_and_sex() {
    let cli = Cli::try_parse_from([
      "tierheim",
      "admit",
      "--name",
      "Milo",
      "--species",
      "Cat",
      "--birth-date",
      "2020-04-01",
      "--sex",
      "f",
      "--enclosure",
      "5",
    ])
    .unwrap();

    let Command::Admit(args) = cli.command else { panic!("expected admit") };
    assert_eq!(args.birth_date, NaiveDate::from_ymd_opt(2020, 4, 1));
    assert_eq!(args.sex, Sex::Female);
    assert_eq!(args.enclosure, Some(5));
    assert_eq!(args.age, None);
  }

  #[test]
  fn sex_defaults_to_unknown() {
    let cli = Cli::try_parse_from(["tierheim", "admit", "--name", "Rex", "--species", "Dog"])
      .unwrap();
    let Command::Admit(args) = cli.command else { panic!("expected admit") };
    assert_eq!(args.sex, Sex::Unknown);
  }

  #[test]
  fn malformed_birth_date_is_rejected() {
    let result = Cli::try_parse_from([
      "tierheim",
      "admit",
      "--name",
      "Rex",
      "--species",
      "Dog",
      "--birth-date",
      "01.02.2020",
    ]);
    assert!(result.is_err());
  }

  #[test]
  fn registry_refusals_exit_with_two() {
    use tierheim_core::{Error, enclosure::EnclosureId};

    let refused = anyhow::Error::from(Error::EnclosureNotFound(EnclosureId(9)));
    assert_eq!(exit_status(&refused), 2);

    let duplicate = anyhow::Error::from(Error::DuplicateRecord {
      name:       "Milo".into(),
      species:    "Cat".into(),
      birth_date: None,
    });
    assert_eq!(exit_status(&duplicate), 2);
  }

  #[test]
  fn storage_and_other_failures_exit_with_one() {
    let storage = anyhow::Error::from(tierheim_core::Error::Storage(Box::new(
      std::io::Error::other("disk gone"),
    )));
    assert_eq!(exit_status(&storage), 1);
    assert_eq!(exit_status(&anyhow::anyhow!("animal not found: 4")), 1);
  }

  #[test]
  fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["tierheim", "enclosure", "list", "--json"]).unwrap();
    assert!(cli.json);
    assert!(matches!(cli.command, Command::Enclosure(EnclosureCommand::List)));
  }
}
