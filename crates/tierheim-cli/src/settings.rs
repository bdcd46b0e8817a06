//! Runtime settings, layered from defaults, an optional TOML file, and
//! `TIERHEIM_*` environment variables (highest precedence).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

const DEFAULT_STORE_PATH: &str = "tierheim.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path: PathBuf,
}

impl Settings {
  pub fn load(config_file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(config_file).required(false))
      .add_source(config::Environment::with_prefix("TIERHEIM"))
      .build()
      .with_context(|| format!("failed to read config file {}", config_file.display()))?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
