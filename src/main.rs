use neon_trace::config::Config;
use neon_trace::console::Dispatched;
use neon_trace::lifecycle::{setup_tracing, SystemError, TracerSystem};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, info_span, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    setup_tracing();

    let config = Config::from_env();
    info!(api_base = %config.api_base, "Starting neon-trace");
    let system = TracerSystem::from_config(&config)?;

    if let Err(e) = system.feed_client.start().await {
        warn!(error = %e, "Position feed did not start");
    }

    let console = system.console();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read console input");
                break;
            }
        };
        match console.dispatch(&line).instrument(info_span!("console")).await {
            Ok(Dispatched::Trace { seq }) => info!(seq, "Trace dispatched"),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Console command failed"),
        }
    }

    drop(console);
    system.shutdown().await
}
