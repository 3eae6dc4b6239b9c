//! Field trial state decoded from the variations switches.
//!
//! Four switches are read, always in this order:
//!
//! 1. `--force-fieldtrials=*Trial1/Group1/Trial2/Group2/` declares trials and
//!    their groups. A leading `*` marks the trial as active.
//! 2. `--force-fieldtrial-params=Trial1.Group1:key/value/key2/value2,...`
//!    attaches params to a declared trial. Names, keys and values are
//!    percent-encoded.
//! 3. `--enable-features=Feature1<Trial1,*Feature2<Trial2` enables features
//!    for a declared trial. A leading `*` leaves the feature at its default.
//! 4. `--disable-features=Feature3<Trial1` disables features for a declared
//!    trial.
//!
//! Only trials declared by `--force-fieldtrials` ever appear in the output.
//! Anything that does not fit the encodings, or refers to an undeclared
//! trial, is skipped without an error.

use std::{
  borrow::Cow,
  fmt,
  sync::LazyLock,
};

use indexmap::IndexMap;
use regex::{
  Captures,
  Regex,
};
use serde::Serialize;

use crate::{
  switches::Switches,
  uri::{
    DecodeError,
    decode_component,
  },
};

pub const FORCE_FIELD_TRIALS: &str = "force-fieldtrials";
pub const FORCE_FIELD_TRIAL_PARAMS: &str = "force-fieldtrial-params";
pub const ENABLE_FEATURES: &str = "enable-features";
pub const DISABLE_FEATURES: &str = "disable-features";

/// `[*]Trial/Group[/]`
static TRIAL_LIST: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(\*)?([^/]+)/([^/]+)/?").expect("valid trial list regex"));

/// `Trial.Group:params`, surrounding whitespace allowed.
static GROUP_INFO: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*([^.:]+)\.([^.:]+):([^:]+)\s*$").expect("valid group info regex")
});

/// `key/value[/]`
static PARAM: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"([^/]+)/([^/]+)/?").expect("valid param regex"));

// The full feature syntax is `Feature<Trial.Group:params`. The group and the
// params are matched so they can be skipped, but never resolved:
// chrome://variations/?show-variations-cmd does not emit them.
static ENABLED_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(\*)?([^.:,<]+)(?:<([^.:,<]+))?(?:\.[^.:,]+)?(?::[^,:]*)?,?")
    .expect("valid enabled feature regex")
});

static DISABLED_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"([^.:,<]+)(?:<([^.:,<]+))?(?:\.[^.:,]+)?(?::[^,:]*)?,?")
    .expect("valid disabled feature regex")
});

/// How a trial overrides a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
  /// Listed with the `*` marker in `--enable-features`.
  Default,
  Enabled,
  Disabled,
}

impl FeatureState {
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Enabled => "enabled",
      Self::Disabled => "disabled",
    }
  }
}

impl fmt::Display for FeatureState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single field trial and everything attached to its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
  /// The group the trial is forced into. Set once when the trial is
  /// declared.
  pub group:    String,
  /// Whether the trial was declared with the `*` activation marker.
  pub active:   bool,
  pub features: IndexMap<String, FeatureState>,
  pub params:   IndexMap<String, String>,
}

impl Trial {
  pub fn new(group: impl Into<String>, active: bool) -> Self {
    Self {
      group: group.into(),
      active,
      features: IndexMap::new(),
      params: IndexMap::new(),
    }
  }

  pub fn feature(&self, name: &str) -> Option<FeatureState> {
    self.features.get(name).copied()
  }

  pub fn param(&self, key: &str) -> Option<&str> {
    self.params.get(key).map(String::as_str)
  }
}

/// Trials keyed by name, in order of declaration.
///
/// Serializes as a map from trial name to [`Trial`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trials {
  entries: IndexMap<String, Trial>,
}

impl Trials {
  pub fn get(&self, name: &str) -> Option<&Trial> {
    self.entries.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.entries.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> indexmap::map::Iter<'_, String, Trial> {
    self.entries.iter()
  }

  /// Trials declared with the activation marker.
  pub fn active(&self) -> impl Iterator<Item = (&String, &Trial)> {
    self.iter().filter(|(_, trial)| trial.active)
  }

  /// Drops every trial that was not declared active.
  pub fn retain_active(&mut self) {
    self.entries.retain(|_, trial| trial.active);
  }

  pub fn into_inner(self) -> IndexMap<String, Trial> {
    self.entries
  }

  /// Declares trials from a `--force-fieldtrials` value.
  ///
  /// Redeclaring a trial replaces it, including its features and params.
  fn declare(&mut self, encoded: &str) {
    for captures in TRIAL_LIST.captures_iter(encoded) {
      let active = captures.get(1).is_some();
      let (name, group) = (&captures[2], &captures[3]);
      if self.entries.contains_key(name) {
        log::debug!("trial '{name}' declared more than once, using group '{group}'");
      }
      self
        .entries
        .insert(name.to_string(), Trial::new(group, active));
    }
  }

  /// Merges params from a `--force-fieldtrial-params` value.
  fn merge_params(&mut self, encoded: &str) {
    for group_info in encoded.split(',') {
      let Some(captures) = GROUP_INFO.captures(group_info) else {
        if !group_info.trim().is_empty() {
          log::debug!("skipping malformed trial params '{group_info}'");
        }
        continue;
      };

      let (name, group) = match decode_pair(&captures) {
        Ok(pair) => pair,
        Err(err) => {
          log::debug!("skipping trial params '{group_info}': {err}");
          continue;
        },
      };

      let Some(trial) = self
        .entries
        .get_mut(name.as_ref())
        .filter(|trial| trial.group == group)
      else {
        log::debug!("skipping params for undeclared trial group '{name}.{group}'");
        continue;
      };

      for param in PARAM.captures_iter(&captures[3]) {
        match decode_pair(&param) {
          Ok((key, value)) => {
            trial.params.insert(key.into_owned(), value.into_owned());
          },
          Err(err) => log::debug!("skipping param of trial '{name}': {err}"),
        }
      }
    }
  }

  /// Applies an `--enable-features` value.
  fn enable_features(&mut self, encoded: &str) {
    for captures in ENABLED_FEATURE.captures_iter(encoded) {
      let state = if captures.get(1).is_some() {
        FeatureState::Default
      } else {
        FeatureState::Enabled
      };
      self.set_feature(&captures[2], captures.get(3).map(|m| m.as_str()), state);
    }
  }

  /// Applies a `--disable-features` value.
  fn disable_features(&mut self, encoded: &str) {
    for captures in DISABLED_FEATURE.captures_iter(encoded) {
      self.set_feature(
        &captures[1],
        captures.get(2).map(|m| m.as_str()),
        FeatureState::Disabled,
      );
    }
  }

  fn set_feature(&mut self, feature: &str, trial: Option<&str>, state: FeatureState) {
    let Some(trial) = trial.and_then(|name| self.entries.get_mut(name)) else {
      log::trace!("feature '{feature}' is not tied to a declared trial");
      return;
    };
    trial.features.insert(feature.to_string(), state);
  }
}

impl<'a> IntoIterator for &'a Trials {
  type Item = (&'a String, &'a Trial);
  type IntoIter = indexmap::map::Iter<'a, String, Trial>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl IntoIterator for Trials {
  type Item = (String, Trial);
  type IntoIter = indexmap::map::IntoIter<String, Trial>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

/// Percent-decodes capture groups 1 and 2.
fn decode_pair<'a>(captures: &Captures<'a>) -> Result<(Cow<'a, str>, Cow<'a, str>), DecodeError> {
  let first = captures.get(1).map_or("", |m| m.as_str());
  let second = captures.get(2).map_or("", |m| m.as_str());
  Ok((decode_component(first)?, decode_component(second)?))
}

/// Builds the trials described by the variations switches.
pub fn build_trials(switches: &Switches) -> Trials {
  let mut trials = Trials::default();
  trials.declare(switches.value_or_empty(FORCE_FIELD_TRIALS));
  trials.merge_params(switches.value_or_empty(FORCE_FIELD_TRIAL_PARAMS));
  trials.enable_features(switches.value_or_empty(ENABLE_FEATURES));
  trials.disable_features(switches.value_or_empty(DISABLE_FEATURES));
  trials
}
