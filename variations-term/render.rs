//! Printing of decoded trials.

use std::io::{
  self,
  Write,
};

use variations_lib::Trials;
use variations_loader::config::OutputFormat;

pub fn write_trials(out: &mut impl Write, trials: &Trials, format: OutputFormat) -> io::Result<()> {
  match format {
    OutputFormat::Json => {
      serde_json::to_writer(&mut *out, trials)?;
      writeln!(out)
    },
    OutputFormat::Pretty => {
      serde_json::to_writer_pretty(&mut *out, trials)?;
      writeln!(out)
    },
    OutputFormat::Summary => write_summary(out, trials),
  }
}

fn write_summary(out: &mut impl Write, trials: &Trials) -> io::Result<()> {
  if trials.is_empty() {
    return writeln!(out, "no field trials found");
  }

  for (idx, (name, trial)) in trials.iter().enumerate() {
    if idx > 0 {
      writeln!(out)?;
    }
    let marker = if trial.active { " (active)" } else { "" };
    writeln!(out, "{name}{marker}")?;
    writeln!(out, "  group: {}", trial.group)?;

    if !trial.features.is_empty() {
      writeln!(out, "  features:")?;
      for (feature, state) in &trial.features {
        writeln!(out, "    {feature}: {state}")?;
      }
    }

    if !trial.params.is_empty() {
      writeln!(out, "  params:")?;
      for (key, value) in &trial.params {
        writeln!(out, "    {key} = {value}")?;
      }
    }
  }

  Ok(())
}
