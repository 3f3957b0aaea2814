//! Logger setup for the headless runner

use env_logger::Builder;
use log::LevelFilter;

/// Install the global logger at info (debug with `verbose`); any `RUST_LOG`
/// directives are layered on top
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format_timestamp_millis()
        .parse_default_env();
    if builder.try_init().is_err() {
        log::debug!("Logger already installed");
    }
}
