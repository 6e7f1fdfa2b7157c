//! Structured logging for the viewer.
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` picks debug output for this
//! crate and info otherwise. Everything goes to stderr.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "code_bubbles=debug,warn"
    } else {
        "code_bubbles=info,warn"
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

pub fn init_logging(verbose: bool) -> Result<()> {
    Registry::default()
        .with(build_env_filter(verbose))
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("failed to install the tracing subscriber")
}
