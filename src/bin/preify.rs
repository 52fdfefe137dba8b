use clap::Parser;
use preify::clock::SystemClock;
use preify::commands::preify::{Options, args::Args, run};
use preify::logging;

/// Stamp a file or directory name with the current (or modification) date.
fn main() {
    let options = Options::from(Args::parse());
    logging::init_logging(options.log_level);

    let exit_code = run(&options, &SystemClock);
    std::process::exit(exit_code);
}
