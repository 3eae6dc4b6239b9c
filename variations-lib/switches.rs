//! Extraction of `--name[=value]` switches from an argument list.

use indexmap::IndexMap;
use serde::Serialize;

/// Switch names mapped to their values, in order of first appearance.
///
/// A switch given without `=` has an empty value. When a switch is repeated
/// the last value wins.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Switches {
  values: IndexMap<String, String>,
}

impl Switches {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses a single argument, returning the switch name and value if the
  /// argument is a switch.
  ///
  /// The name is everything between the leading `--` and the first `=` and
  /// must not be empty.
  pub fn parse_switch(arg: &str) -> Option<(&str, &str)> {
    let rest = arg.strip_prefix("--")?;
    let (name, value) = rest.split_once('=').unwrap_or((rest, ""));
    if name.is_empty() {
      return None;
    }
    Some((name, value))
  }

  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.values.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.values.get(name).map(String::as_str)
  }

  /// The value of `name`, or an empty string if the switch is absent.
  pub fn value_or_empty(&self, name: &str) -> &str {
    self.get(name).unwrap_or_default()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .values
      .iter()
      .map(|(name, value)| (name.as_str(), value.as_str()))
  }
}

impl<S: AsRef<str>> FromIterator<S> for Switches {
  fn from_iter<I: IntoIterator<Item = S>>(args: I) -> Self {
    let mut switches = Self::new();
    for arg in args {
      if let Some((name, value)) = Self::parse_switch(arg.as_ref()) {
        switches.insert(name, value);
      }
    }
    switches
  }
}

/// Collects the switches out of `args`, ignoring every other argument.
pub fn extract_switches<S: AsRef<str>>(args: impl IntoIterator<Item = S>) -> Switches {
  args.into_iter().collect()
}
