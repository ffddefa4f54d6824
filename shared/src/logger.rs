use std::io::Write;

use chrono::Local;
use colored::Colorize;
use env_logger::{Builder, Env};
use error_iter::ErrorIter as _;
use log::{error, Level};

pub fn init() {
    // A second init (tests, embedding) keeps the first logger.
    let _ = builder().try_init();
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        let level = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".purple(),
        };
        writeln!(
            buf,
            "{} {} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });
    builder
}

pub fn log_error<E: std::error::Error + 'static>(context: &str, err: &E) {
    error!("{context} failed: {err}");
    for source in err.sources().skip(1) {
        error!("  Caused by: {source}");
    }
}
