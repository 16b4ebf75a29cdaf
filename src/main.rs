use anyhow::Result;
use price_watcher::{plugins::ExtractorRegistry, runner::RunDriver, AppConfig};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing; the guard flushes buffered lines on exit
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_watcher=info".parse()?),
        )
        .with_writer(writer)
        .init();

    info!("Starting price watcher run");

    let config = AppConfig::load()?;
    let registry = ExtractorRegistry::with_defaults();
    let driver = RunDriver::from_config(&config, &registry)?;

    let report = driver.run().await?;
    info!(
        path = %report.output_path.display(),
        records = report.records_written,
        succeeded = report.watchers_succeeded,
        failed = report.failures.len(),
        "Run complete"
    );

    Ok(())
}
