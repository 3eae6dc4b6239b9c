//! Terminal front end: decodes the field trials forced by a browser command
//! line and prints them.

mod cli;
mod logging;
mod render;

use std::{
  fs,
  io::{
    self,
    Write,
  },
};

use eyre::{
  Result,
  WrapErr,
};

use crate::cli::{
  CliOptions,
  Input,
};

fn main() -> Result<()> {
  let options = CliOptions::parse()?;

  variations_loader::initialize_config_file(options.config_file.clone());
  let config = variations_loader::config::user_config()?;
  logging::setup_logging(options.verbosity, config.log.level, options.log_file.clone())?;
  log::debug!("using config file {}", variations_loader::config_file().display());

  let command_line = read_input(&options.input)?;
  let mut trials = variations_lib::trials_from_command_line(&command_line);
  log::info!("decoded {} field trials", trials.len());

  if options.active_only || config.output.active_only {
    trials.retain_active();
  }

  let format = options.format.unwrap_or(config.output.format);
  let mut stdout = io::stdout().lock();
  render::write_trials(&mut stdout, &trials, format).wrap_err("failed to write output")?;
  stdout.flush().wrap_err("failed to write output")?;

  Ok(())
}

fn read_input(input: &Input) -> Result<String> {
  match input {
    Input::Inline(command_line) => Ok(command_line.clone()),
    Input::File(path) => {
      fs::read_to_string(path).wrap_err_with(|| format!("failed to read {}", path.display()))
    },
    Input::Stdin => io::read_to_string(io::stdin()).wrap_err("failed to read stdin"),
  }
}
