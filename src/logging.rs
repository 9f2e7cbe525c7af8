use anyhow::Result;
use std::io;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// `level` is an `EnvFilter` directive; `RUST_LOG` wins when set.
pub fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }
    info!("logging initialized");
    Ok(())
}
