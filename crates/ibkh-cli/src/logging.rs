//! Logging initialisation via tracing-subscriber.
//!
//! `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
//! Logs go to stderr so stdout stays clean for command output.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

pub fn init(verbose: bool) -> Result<()> {
    let level = default_level(verbose);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid log level '{level}': {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to set subscriber: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level() {
        assert_eq!(default_level(false), "info");
        assert_eq!(default_level(true), "debug");
    }

    #[test]
    fn init_succeeds_or_is_already_set() {
        match init(false) {
            Ok(()) => {}
            Err(e) if e.to_string().contains("set subscriber") => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
