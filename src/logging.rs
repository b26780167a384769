//! Tracing bootstrap
//!
//! Nothing is logged unless `RUST_LOG` is set, e.g.
//! `RUST_LOG=pinquest=debug pinquest exercice.pin 2> pinquest.log`.
//! Output goes to stderr; redirect it while the TUI owns the terminal.

use std::io;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber once, only when `RUST_LOG` is set
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An embedding application may already own the global subscriber
            let _ = tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(false)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_repeatable() {
        init_tracing();
        init_tracing();
    }
}
