//! Logger setup and runtime verbosity control

use log::LevelFilter;
use std::io::Write;

/// Parse a level name as accepted on the command line
///
/// Accepts DEBUG, INFO, WARNING (or WARN) and ERROR in any case.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.to_ascii_uppercase().as_str() {
        "DEBUG" => Some(LevelFilter::Debug),
        "INFO" => Some(LevelFilter::Info),
        "WARNING" | "WARN" => Some(LevelFilter::Warn),
        "ERROR" => Some(LevelFilter::Error),
        _ => None,
    }
}

/// Initialize the global logger
///
/// Our own records pass the logger's filter at debug level so that the
/// effective level can be changed later with `log::set_max_level`.
pub fn init(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
        .format(|buf, record| writeln!(buf, "{} > {}", record.level(), record.args()))
        .init();
    log::set_max_level(level);
}

/// Switch between debug and info output immediately
pub fn set_debug(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    log::set_max_level(level);
}
