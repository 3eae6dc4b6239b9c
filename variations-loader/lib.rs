pub mod config;

use std::{
  path::{
    Path,
    PathBuf,
  },
  sync::OnceLock,
};

use etcetera::base_strategy::{
  BaseStrategy,
  choose_base_strategy,
};

static CONFIG_FILE: OnceLock<PathBuf> = OnceLock::new();

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

pub fn initialize_config_file(specified_file: Option<PathBuf>) {
  let config_file = specified_file.unwrap_or_else(default_config_file);
  CONFIG_FILE.set(config_file).ok();
}

pub fn initialize_log_file(specified_file: Option<PathBuf>) {
  let log_file = specified_file.unwrap_or_else(default_log_file);
  ensure_parent_dir(&log_file);
  LOG_FILE.set(log_file).ok();
}

pub fn config_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os("VARIATIONS_CONFIG_DIR") {
    return PathBuf::from(dir);
  }
  let strategy = choose_base_strategy().expect("Unable to find the config directory!");
  let mut path = strategy.config_dir();
  path.push("variations");
  path
}

pub fn cache_dir() -> PathBuf {
  if let Some(dir) = std::env::var_os("VARIATIONS_CACHE_DIR") {
    return PathBuf::from(dir);
  }
  let strategy = choose_base_strategy().expect("Unable to find the cache directory!");
  let mut path = strategy.cache_dir();
  path.push("variations");
  path
}

/// The config file in use. Reading it is left to [`config::user_config`]; the
/// file does not need to exist.
pub fn config_file() -> PathBuf {
  CONFIG_FILE.get_or_init(default_config_file).clone()
}

pub fn log_file() -> PathBuf {
  LOG_FILE
    .get_or_init(|| {
      let path = default_log_file();
      ensure_parent_dir(&path);
      path
    })
    .clone()
}

pub fn default_log_file() -> PathBuf {
  cache_dir().join("variations.log")
}

/// Merge two TOML documents, merging values from `right` onto `left`
///
/// `merge_depth` sets the nesting depth up to which tables are merged instead
/// of overridden. Below that depth, and for every non-table value, `right`
/// replaces `left`.
///
/// With a depth of 2 the user file
///
/// ```toml
/// [output]
/// format = "json"
/// ```
///
/// keeps `output.active-only` and the whole `[log]` table from the defaults.
pub fn merge_toml_values(left: toml::Value, right: toml::Value, merge_depth: usize) -> toml::Value {
  use toml::Value;

  match (left, right) {
    (Value::Table(mut left_map), Value::Table(right_map)) if merge_depth > 0 => {
      for (rname, rvalue) in right_map {
        let merged_value = match left_map.remove(&rname) {
          Some(lvalue) => merge_toml_values(lvalue, rvalue, merge_depth - 1),
          None => rvalue,
        };
        left_map.insert(rname, merged_value);
      }
      Value::Table(left_map)
    },
    // Catch everything else we didn't handle, and use the right value
    (_, value) => value,
  }
}

fn default_config_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn ensure_parent_dir(path: &Path) {
  if let Some(parent) = path.parent()
    && !parent.exists()
  {
    std::fs::create_dir_all(parent).ok();
  }
}
