//! Runs the users → posts → comments pipeline against the configured API.
//!
//! Configuration comes from `CHAINFLOW_BASE_URL`, `CHAINFLOW_TIMEOUT_SECONDS`
//! and `CHAINFLOW_USER_AGENT`. Logging honours `RUST_LOG`; set
//! `CHAINFLOW_LOG_FORMAT=json` for JSON lines.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chainflow::prelude::*;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("CHAINFLOW_LOG_FORMAT").is_ok_and(|format| format == "json");

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ChainConfig::from_env().context("loading configuration")?;
    let fetcher = Arc::new(HttpJsonFetcher::new(&config).context("building HTTP client")?);

    let runner = PipelineRunner::builder(fetcher)
        .config(config)
        .observer(Arc::new(TracingObserver::info()))
        .finalizer(Arc::new(|summary: &RunSummary| {
            info!(status = %summary.status, duration_ms = summary.duration_ms, "Done");
        }))
        .build()
        .context("building pipeline")?;

    match runner.run().await {
        Some(result) => info!(
            user = %result.user.name,
            post = %result.post.title,
            comments = result.comments.len(),
            "Result"
        ),
        None => info!("No result"),
    }

    Ok(())
}
