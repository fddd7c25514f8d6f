//! Process-wide tracing setup
//!
//! The client only emits `tracing` events; hosts that have no subscriber of
//! their own call [`init`] once at start.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a fmt subscriber filtered by `RUST_LOG` (default `info`)
///
/// Returns an error instead of panicking if a global subscriber is already set.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
