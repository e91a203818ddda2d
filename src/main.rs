use clap::Parser;
use foldsync::commands::{serve, shutdown_signal};
use foldsync::config::Cli;
use foldsync::logging::{self, TracingSink};
use foldsync::{Config, EventSink};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    logging::init(&config.log_folder)?;
    info!(
        "foldsync v{} mirroring {} -> {} every {}s",
        foldsync::VERSION,
        config.source.display(),
        config.replica.display(),
        config.interval.as_secs()
    );
    if config.log_folder_in_source() {
        warn!(
            "Log folder {} is inside the source; log files will be mirrored",
            config.log_folder.display()
        );
    }

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let token = CancellationToken::new();
    if !config.once {
        tokio::spawn(shutdown_signal(token.clone()));
    }

    let runs = serve(config, sink, token).await?;
    info!("Exiting after {} run(s).", runs);
    Ok(())
}
