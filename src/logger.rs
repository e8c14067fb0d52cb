use core::fmt::Arguments;
use log::{LevelFilter, Record};
use std::io;

/// Map the number of `-v` flags onto a level. Warnings are always shown.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Send log output to stderr so it never interleaves with the battle text on stdout.
pub fn init(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let level = level_for_verbosity(verbosity);

    fern::Dispatch::new()
        .format(console_format)
        .level(LevelFilter::Warn)
        .level_for("pokemon_duel", level)
        .chain(io::stderr())
        .apply()
}

fn console_format(callback: fern::FormatCallback, message: &Arguments, record: &Record) {
    let mut name = record.target().to_owned();

    if let Some(line) = record.line() {
        name.push_str(&format!(":{}", line));
    }

    callback.finish(format_args!("[{} {}] {}", record.level(), name, message))
}
