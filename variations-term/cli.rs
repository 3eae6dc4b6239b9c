use std::{
  fmt,
  path::PathBuf,
};

use clap::{
  ArgAction,
  Parser,
  ValueEnum,
};
use eyre::Result;
use variations_loader::config::OutputFormat;

/// Where the command line to decode comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
  /// Words given on our own command line, joined with spaces.
  Inline(String),
  File(PathBuf),
  Stdin,
}

#[derive(Clone, Debug)]
pub struct CliOptions {
  pub input:       Input,
  /// Overrides `output.format` from the config when set.
  pub format:      Option<OutputFormat>,
  pub active_only: bool,
  pub verbosity:   u8,
  pub log_file:    Option<PathBuf>,
  pub config_file: Option<PathBuf>,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    raw.try_into()
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "variations",
  about = "Show the field trials forced by a browser command line",
  long_about = None,
  after_help = "Pass the browser command line after `--`, with --file, or on stdin."
)]
struct RawCli {
  /// Read the command line from a file ("-" for stdin)
  #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "command_line")]
  file: Option<PathBuf>,

  /// Output format (defaults to the configured one)
  #[arg(short = 'o', long = "format", value_enum, value_name = "FORMAT")]
  format: Option<FormatArg>,

  /// Only print trials carrying the activation marker
  #[arg(long = "active-only")]
  active_only: bool,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Load configuration from a specific file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  config_file: Option<PathBuf>,

  /// The browser command line to decode
  #[arg(
    value_name = "COMMAND_LINE",
    trailing_var_arg = true,
    allow_hyphen_values = true
  )]
  command_line: Vec<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
  Json,
  Pretty,
  Summary,
}

impl fmt::Display for FormatArg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Json => write!(f, "json"),
      Self::Pretty => write!(f, "pretty"),
      Self::Summary => write!(f, "summary"),
    }
  }
}

impl From<FormatArg> for OutputFormat {
  fn from(arg: FormatArg) -> Self {
    match arg {
      FormatArg::Json => Self::Json,
      FormatArg::Pretty => Self::Pretty,
      FormatArg::Summary => Self::Summary,
    }
  }
}

impl TryFrom<RawCli> for CliOptions {
  type Error = eyre::Report;

  fn try_from(raw: RawCli) -> Result<Self> {
    let input = match raw.file {
      Some(path) if path.as_os_str() == "-" => Input::Stdin,
      Some(path) => {
        if path.is_dir() {
          eyre::bail!("'{}' is a directory", path.display());
        }
        Input::File(path)
      },
      None if raw.command_line.is_empty() => Input::Stdin,
      None => Input::Inline(raw.command_line.join(" ")),
    };

    Ok(Self {
      input,
      format: raw.format.map(OutputFormat::from),
      active_only: raw.active_only,
      verbosity: raw.verbosity,
      log_file: raw.log_file,
      config_file: raw.config_file,
    })
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[track_caller]
  fn parse(args: &[&str]) -> CliOptions {
    let raw = RawCli::try_parse_from(std::iter::once("variations").chain(args.iter().copied()))
      .unwrap();
    raw.try_into().unwrap()
  }

  #[test]
  fn defaults_to_stdin() {
    let options = parse(&[]);
    assert_eq!(options.input, Input::Stdin);
    assert_eq!(options.format, None);
    assert!(!options.active_only);
    assert_eq!(options.verbosity, 0);
  }

  #[test]
  fn inline_command_line_after_separator() {
    let options = parse(&["-o", "json", "--", "chrome", "--force-fieldtrials=A/G", "--x"]);
    assert_eq!(
      options.input,
      Input::Inline("chrome --force-fieldtrials=A/G --x".to_string())
    );
    assert_eq!(options.format, Some(OutputFormat::Json));
  }

  #[test]
  fn inline_command_line_as_one_word() {
    let options = parse(&["--active-only", "chrome --enable-features=F<A"]);
    assert_eq!(
      options.input,
      Input::Inline("chrome --enable-features=F<A".to_string())
    );
    assert!(options.active_only);
  }

  #[test]
  fn file_input() {
    assert_eq!(parse(&["-f", "-"]).input, Input::Stdin);
    assert_eq!(
      parse(&["--file", "cmdline.txt"]).input,
      Input::File(PathBuf::from("cmdline.txt"))
    );
  }

  #[test]
  fn verbosity_and_paths() {
    let options = parse(&["-vvv", "--log", "out.log", "-c", "my.toml"]);
    assert_eq!(options.verbosity, 3);
    assert_eq!(options.log_file, Some(PathBuf::from("out.log")));
    assert_eq!(options.config_file, Some(PathBuf::from("my.toml")));
  }

  #[test]
  fn file_conflicts_with_inline() {
    assert!(RawCli::try_parse_from(["variations", "-f", "x", "--", "chrome"]).is_err());
  }
}
