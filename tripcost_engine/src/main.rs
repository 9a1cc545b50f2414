//! Entry point for the Trip Cost Engine binary.
//!
//! Running this binary starts an HTTP server exposing the quotation,
//! customer intake and invoice API.  Configuration comes from the
//! environment (see [`tripcost_engine::config::Config`]); log verbosity
//! is controlled through `RUST_LOG`.

use tracing_subscriber::EnvFilter;
use tripcost_engine::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = tripcost_engine::api::serve(config).await {
        tracing::error!(error = %err, "server stopped");
        return Err(err);
    }
    Ok(())
}
