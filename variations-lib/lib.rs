//! Field trial configuration recovered from a browser command line.
//!
//! The pipeline is [`command_line::tokenize`] → [`switches::extract_switches`]
//! → [`trials::build_trials`]; [`trials_from_command_line`] runs all three.

pub mod command_line;
pub mod switches;
pub mod trials;
pub mod uri;

pub use command_line::{
  Tokenizer,
  tokenize,
};
pub use switches::{
  Switches,
  extract_switches,
};
pub use trials::{
  FeatureState,
  Trial,
  Trials,
  build_trials,
};

/// Decodes the field trials described by a raw command line.
///
/// Never fails: anything that cannot be understood is left out of the
/// result.
pub fn trials_from_command_line(input: &str) -> Trials {
  let mut tokenizer = Tokenizer::new(input);
  let switches: Switches = tokenizer.by_ref().collect();
  if !tokenizer.is_terminated() {
    log::debug!(
      "command line ends in {:?}, keeping the partial final argument",
      tokenizer.state()
    );
  }
  log::trace!("found {} switches", switches.len());
  build_trials(&switches)
}
