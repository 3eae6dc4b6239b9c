use std::path::PathBuf;

use eyre::{
  Result,
  WrapErr,
};
use log::LevelFilter;

/// The level requested by repeated `-v` flags.
fn verbosity_level(verbosity: u8) -> LevelFilter {
  match verbosity {
    0 => LevelFilter::Off,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Installs the global logger.
///
/// `-v` flags can only raise the configured level. Logs go to stderr unless
/// a log file was requested.
pub fn setup_logging(
  verbosity: u8,
  configured: LevelFilter,
  log_file: Option<PathBuf>,
) -> Result<()> {
  let level = configured.max(verbosity_level(verbosity));

  let dispatch = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .level(level);

  let dispatch = match log_file {
    Some(path) => {
      variations_loader::initialize_log_file(Some(path));
      let path = variations_loader::log_file();
      let file = fern::log_file(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
      dispatch.chain(file)
    },
    None => dispatch.chain(std::io::stderr()),
  };

  dispatch.apply().wrap_err("failed to install logger")
}
