use std::{
  fs,
  io,
  path::Path,
};

use eyre::{
  Context,
  Result,
};
use log::LevelFilter;
use serde::Deserialize;

/// How trials are printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// Compact JSON on a single line.
  Json,
  /// Indented JSON.
  Pretty,
  /// One block of plain text per trial.
  #[default]
  Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
  pub format:      OutputFormat,
  /// Leave out trials declared without the activation marker.
  pub active_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LogConfig {
  /// Level used when no `-v` flag is given.
  pub level: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  pub output: OutputConfig,
  pub log:    LogConfig,
}

/// Default built-in config.toml.
pub fn default_config() -> Result<toml::Value> {
  let default_config = include_str!("config.toml");
  toml::from_str(default_config).context("failed to parse built-in config.toml")
}

/// Loads `path` merged onto the built-in defaults.
///
/// A missing file yields the defaults. A file that cannot be read or parsed,
/// or that contains unknown keys, is an error.
pub fn load_config(path: &Path) -> Result<Config> {
  let default = default_config()?;

  let merged = match fs::read_to_string(path) {
    Ok(user) => {
      let user: toml::Value = toml::from_str(&user)
        .with_context(|| format!("failed to parse {}", path.display()))?;
      crate::merge_toml_values(default, user, 2)
    },
    Err(err) if err.kind() == io::ErrorKind::NotFound => {
      log::debug!("no config file at {}, using defaults", path.display());
      default
    },
    Err(err) => {
      return Err(err).with_context(|| format!("failed to read {}", path.display()));
    },
  };

  merged
    .try_into::<Config>()
    .with_context(|| format!("invalid configuration in {}", path.display()))
}

/// User configured config.toml file, merged with the default config.
pub fn user_config() -> Result<Config> {
  load_config(&crate::config_file())
}

#[cfg(test)]
mod test {
  use std::io::Write;

  use super::*;

  fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
  }

  #[test]
  fn built_in_defaults() {
    let config = load_config(Path::new("/nonexistent/variations/config.toml")).unwrap();
    assert_eq!(config, Config {
      output: OutputConfig {
        format:      OutputFormat::Summary,
        active_only: false,
      },
      log:    LogConfig {
        level: LevelFilter::Warn,
      },
    });
  }

  #[test]
  fn user_values_override_defaults() {
    let file = write_config("[output]\nformat = \"pretty\"\n\n[log]\nlevel = \"debug\"\n");
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.output.format, OutputFormat::Pretty);
    assert!(!config.output.active_only);
    assert_eq!(config.log.level, LevelFilter::Debug);
  }

  #[test]
  fn partial_table_keeps_other_defaults() {
    let file = write_config("[output]\nactive-only = true\n");
    let config = load_config(file.path()).unwrap();
    assert!(config.output.active_only);
    assert_eq!(config.output.format, OutputFormat::Summary);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let file = write_config("[output]\ncolour = true\n");
    assert!(load_config(file.path()).is_err());
  }

  #[test]
  fn invalid_toml_is_rejected() {
    let file = write_config("[output\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("failed to parse"));
  }

  #[test]
  fn invalid_format_is_rejected() {
    let file = write_config("[output]\nformat = \"xml\"\n");
    assert!(load_config(file.path()).is_err());
  }
}
