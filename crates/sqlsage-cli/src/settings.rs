//! Layered configuration: defaults < TOML file < `SQLSAGE_*` environment
//! variables < command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Resolved assistant configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// SQLite database the assistant introspects and queries.
  pub db_path:       PathBuf,
  /// Where the training-state record lives.
  pub state_path:    PathBuf,
  /// Structured training-examples file (TOML).
  pub examples_path: PathBuf,
  /// Base URL of the inference service.
  pub service_url:   String,
  pub api_key:       String,
  /// Hosted model name tied to the API key.
  pub model:         String,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      db_path:       PathBuf::from("company.db"),
      state_path:    PathBuf::from("training_state.json"),
      examples_path: PathBuf::from("training_examples.toml"),
      service_url:   "http://localhost:8800".to_string(),
      api_key:       String::new(),
      model:         "default".to_string(),
    }
  }
}

/// Optional per-flag overrides, applied last.
#[derive(Debug, Default)]
pub struct Overrides {
  pub db:       Option<PathBuf>,
  pub state:    Option<PathBuf>,
  pub examples: Option<PathBuf>,
  pub url:      Option<String>,
  pub api_key:  Option<String>,
  pub model:    Option<String>,
}

impl Settings {
  /// Load from the config file (if present) layered with `SQLSAGE_*`
  /// environment variables.
  pub fn load(config_path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(config_path.to_owned()).required(false))
      .add_source(config::Environment::with_prefix("SQLSAGE"))
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")
  }

  pub fn apply(&mut self, overrides: Overrides) {
    if let Some(db) = overrides.db {
      self.db_path = db;
    }
    if let Some(state) = overrides.state {
      self.state_path = state;
    }
    if let Some(examples) = overrides.examples {
      self.examples_path = examples;
    }
    if let Some(url) = overrides.url {
      self.service_url = url;
    }
    if let Some(api_key) = overrides.api_key {
      self.api_key = api_key;
    }
    if let Some(model) = overrides.model {
      self.model = model;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn overrides_win_over_defaults() {
    let mut settings = Settings::default();
    settings.apply(Overrides {
      db: Some(PathBuf::from("/tmp/other.db")),
      model: Some("sage-eu".into()),
      ..Default::default()
    });

    assert_eq!(settings.db_path, PathBuf::from("/tmp/other.db"));
    assert_eq!(settings.model, "sage-eu");
    // Untouched fields keep their defaults.
    assert_eq!(settings.state_path, PathBuf::from("training_state.json"));
  }

  #[test]
  fn file_settings_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sqlsage.toml");
    std::fs::write(
      &path,
      "db_path = \"hr.db\"\nservice_url = \"https://ask.example.com\"\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.db_path, PathBuf::from("hr.db"));
    assert_eq!(settings.service_url, "https://ask.example.com");
    assert_eq!(settings.model, "default");
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.db_path, PathBuf::from("company.db"));
  }
}
