//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// HTTP client internals are only interesting when explicitly asked for.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

/// Initialize the logging subsystem.
///
/// Log output goes to stderr; stdout carries the rename report. `RUST_LOG`
/// overrides the level entirely.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},{QUIET_DEPENDENCIES}")));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose)
                    .with_writer(std::io::stderr)
                    .with_ansi(console::colors_enabled_stderr()),
            )
            .init();
    }
}

/// Initialize logging with configuration from Config.
///
/// CLI flags only ever raise verbosity or switch to JSON; they never undo
/// what the config file asks for.
pub fn init_from_config(
    config: &logomark_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let (verbose, json_format) = resolve(&config.logging, verbose_override, json_logs_override);
    init(verbose, json_format);
}

fn resolve(
    logging: &logomark_core::config::LoggingConfig,
    verbose_override: bool,
    json_logs_override: bool,
) -> (bool, bool) {
    let level = logging.level.to_ascii_lowercase();
    let verbose = verbose_override || level == "debug" || level == "trace";
    let json_format = json_logs_override || logging.format.eq_ignore_ascii_case("json");
    (verbose, json_format)
}
