//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so board output on stdout stays clean. `RUST_LOG`
//! replaces the default filter when set.

use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Default filter directive for a given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "taskboard=debug"
    } else {
        "taskboard=info"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn configure_logging(verbose: bool, json: bool) {
    let filter = build_filter(verbose);
    let result = if json {
        registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };
    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}
