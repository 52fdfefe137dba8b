use crate::logging::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "preify", version)]
#[command(
    about = "Apply a suffix to the given file or folder with the date in it so the same folder can be archived more than once into the same archive",
    long_about = None
)]
pub struct Args {
    /// Include the time in the filename
    #[arg(short = 't', long = "include-time")]
    pub include_time: bool,

    /// Use the file's modification time instead of the current time
    #[arg(short = 'm', long = "mod-time")]
    pub mod_time: bool,

    /// Set the logging level
    #[arg(short = 'L', long = "log-level", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Only print the result
    #[arg(short = 'p', long = "print-only")]
    pub print_only: bool,

    /// Filename to "preify"
    pub filename: PathBuf,
}
