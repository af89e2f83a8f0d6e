use chrono::{DateTime, Utc};
use clap::Parser;
use host_observer::collectors::OrEmpty;
use host_observer::config::{Command, Config};
use host_observer::host::HostMetricsClient;
use host_observer::logging;
use host_observer::source::HttpSource;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Serialize)]
struct Envelope {
    agent_id: String,
    collected_at: DateTime<Utc>,
    metrics: Value,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.json_logs);

    let source = HttpSource::new(config.endpoint.clone(), config.timeout())?;
    let client = HostMetricsClient::new(Arc::new(source)).with_cpu_interval(config.cpu_interval());
    let command = config.command();
    info!(endpoint = %config.endpoint, ?command, "collecting host metrics");

    let metrics = match command {
        Command::All => {
            serde_json::to_value(client.get_all_metrics(&config.cpu, &config.mountpoint).await)?
        }
        Command::Cpu { cpu, interval_ms } => {
            let cpu = cpu.unwrap_or_else(|| config.cpu.clone());
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.cpu_interval());
            serde_json::to_value(client.get_cpu_usage(&cpu, interval).await)?
        }
        Command::Memory => serde_json::to_value(OrEmpty(&client.get_memory_usage().await))?,
        Command::Disk { mountpoint } => {
            let mountpoint = mountpoint.unwrap_or_else(|| config.mountpoint.clone());
            serde_json::to_value(OrEmpty(&client.get_disk_usage(&mountpoint).await))?
        }
        Command::Load => serde_json::to_value(client.get_load_average().await)?,
    };

    let envelope = Envelope {
        agent_id: config.resolved_agent_id(),
        collected_at: Utc::now(),
        metrics,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
