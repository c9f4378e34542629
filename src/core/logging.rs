//! Tracing subscriber setup
//!
//! Logs go to stderr so that command output on stdout stays pipeable.
//! `RUST_LOG` wins over everything; otherwise `-v` flags raise the configured
//! level one step each.

use tracing_subscriber::{fmt, EnvFilter};

use crate::core::config::LogConfig;

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Level after applying `verbosity` steps on top of `base`
pub fn effective_level(base: &str, verbosity: u8) -> String {
    let base = base.trim().to_ascii_lowercase();
    match LEVELS.iter().position(|l| *l == base) {
        Some(idx) => {
            let raised = (idx + usize::from(verbosity)).min(LEVELS.len() - 1);
            LEVELS[raised].to_string()
        }
        // Not a bare level (e.g. a directive list); pass it through untouched
        None if verbosity == 0 => base,
        None => LEVELS[(1 + usize::from(verbosity)).min(LEVELS.len() - 1)].to_string(),
    }
}

/// Filter directive for this crate at the given level
fn directive(level: &str) -> String {
    if LEVELS.contains(&level) {
        format!("tpm={}", level)
    } else {
        level.to_string()
    }
}

/// Install the global subscriber; later calls are no-ops
pub fn init_tracing(log: &LogConfig, verbosity: u8, json: bool) {
    let level = effective_level(&log.level, verbosity);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| directive(&level));

    let filter = EnvFilter::try_new(&filter_directive)
        .unwrap_or_else(|_| EnvFilter::new(directive("warn")));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json || log.json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_raises_level() {
        assert_eq!(effective_level("warn", 0), "warn");
        assert_eq!(effective_level("warn", 1), "info");
        assert_eq!(effective_level("warn", 2), "debug");
        assert_eq!(effective_level("WARN", 9), "trace");
        assert_eq!(effective_level("error", 1), "warn");
    }

    #[test]
    fn test_directive_lists_pass_through() {
        assert_eq!(effective_level("tpm=debug,info", 0), "tpm=debug,info");
        assert_eq!(directive("tpm=debug,info"), "tpm=debug,info");
        assert_eq!(directive("info"), "tpm=info");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let log = LogConfig::default();
        init_tracing(&log, 0, false);
        init_tracing(&log, 2, true);
    }
}
