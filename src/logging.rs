//! Diagnostic logging setup
//!
//! Logs go to stderr so report output on stdout stays clean for piping.
//! `FINTRACK_LOG` takes an `EnvFilter` directive and replaces the `warn`
//! default. `--verbose` turns on debug output for this crate and overrides
//! the variable.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FINTRACK_LOG";

const VERBOSE_DIRECTIVE: &str = "finance_tracker=debug,fintrack=debug";
const DEFAULT_DIRECTIVE: &str = "warn";

/// The filter directive for a run
fn filter_directive(verbose: bool, from_env: Option<String>) -> String {
    if verbose {
        return VERBOSE_DIRECTIVE.to_string();
    }
    from_env
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let directive = filter_directive(verbose, std::env::var(LOG_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Ignoring invalid {} directive '{}': {}", LOG_ENV, directive, e);
        EnvFilter::new(DEFAULT_DIRECTIVE)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_level() {
        assert_eq!(filter_directive(false, None), "warn");
        assert!(filter_directive(true, None).contains("debug"));
    }

    #[test]
    fn test_env_directive_unless_verbose() {
        assert_eq!(filter_directive(false, Some("info".into())), "info");
        assert_eq!(filter_directive(false, Some("  ".into())), "warn");
        assert_eq!(
            filter_directive(true, Some("error".into())),
            "finance_tracker=debug,fintrack=debug"
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
