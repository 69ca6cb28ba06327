#![warn(missing_docs)]

//! Shared logging helpers and CLI argument definitions for the MemeMeow workspace.
//!
//! - [`LogArgs`]: `--trace`, `--debug`, `--log-level`, `--log-filter`
//! - [`compute_spec`]: turn those flags (or `RUST_LOG`) into a crate-scoped filter
//! - [`init`]: install the fmt subscriber

use std::{env, io};

use clap::Args;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "meow_engine=trace,meow_gateway=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Final filter spec for these arguments.
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        // App and core crates
        "mememeow",
        "meow_engine",
        "meow_gateway",
        "meow_protocol",
        // Utilities
        "keycode",
        "config",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
///
/// Always includes `mrpc::connection=off` to suppress shutdown noise.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    let mut parts: Vec<String> = our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect();
    parts.push("mrpc::connection=off".to_string());
    parts.join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env (plus mrpc suppression if not present)
/// - default to crate-scoped `warn`, so command output stays readable
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    match env::var("RUST_LOG") {
        Ok(spec) if spec.contains("mrpc::connection") => spec,
        Ok(spec) => format!("{},mrpc::connection=off", spec),
        Err(_) => level_spec_for("warn"),
    }
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

/// Install the global subscriber: env filter plus compact fmt output on
/// stderr. A second call is a no-op.
pub fn init(args: &LogArgs) {
    let spec = args.spec();
    let installed = tracing_subscriber::registry()
        .with(env_filter_from_spec(&spec))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .is_ok();
    if installed {
        debug!(spec = %spec, "logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        assert_eq!(
            compute_spec(false, false, Some("info"), Some("meow_engine=trace")),
            "meow_engine=trace"
        );
    }

    #[test]
    fn level_flags_are_crate_scoped() {
        let spec = compute_spec(false, true, None, None);
        assert!(spec.contains("meow_engine=debug"));
        assert!(spec.contains("meow_gateway=debug"));
        assert!(spec.ends_with("mrpc::connection=off"));

        let spec = LogArgs {
            log_level: Some("INFO".into()),
            ..LogArgs::default()
        }
        .spec();
        assert!(spec.contains("mememeow=info"));
    }
}
