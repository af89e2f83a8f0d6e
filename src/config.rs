use crate::host::{DEFAULT_CPU, DEFAULT_MOUNTPOINT};
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "host-observer", version, about)]
pub struct Config {
    /// Node exporter metrics endpoint.
    #[arg(
        long,
        env = "NODE_EXPORTER_URL",
        default_value = "http://node_exporter:9100/metrics"
    )]
    pub endpoint: String,

    /// Timeout for each individual fetch, in milliseconds.
    #[arg(long, env = "HOST_OBSERVER_TIMEOUT_MS", default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Logical CPU to sample.
    #[arg(long, env = "HOST_OBSERVER_CPU", default_value = DEFAULT_CPU)]
    pub cpu: String,

    /// Filesystem mountpoint for disk usage.
    #[arg(long, env = "HOST_OBSERVER_MOUNTPOINT", default_value = DEFAULT_MOUNTPOINT)]
    pub mountpoint: String,

    /// Wait between the two CPU counter snapshots, in milliseconds.
    #[arg(long, env = "HOST_OBSERVER_CPU_INTERVAL_MS", default_value_t = 1000)]
    pub cpu_interval_ms: u64,

    /// Unique identifier for this agent instance.
    /// if none provided, default to hostname.
    #[arg(long, env = "HOST_OBSERVER_AGENT_ID")]
    pub agent_id: Option<String>,

    /// Enable JSON structured logging.
    #[arg(long, env = "HOST_OBSERVER_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// CPU, memory, disk and load in one report (default).
    All,
    /// CPU utilization percentage from two snapshots.
    Cpu {
        #[arg(long)]
        cpu: Option<String>,
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Memory usage.
    Memory,
    /// Filesystem usage for one mountpoint.
    Disk {
        #[arg(long)]
        mountpoint: Option<String>,
    },
    /// 1, 5 and 15 minute load averages.
    Load,
}

impl Config {
    /// get agent ID, upon failure fallback to hostname.
    pub fn resolved_agent_id(&self) -> String {
        self.agent_id.clone().unwrap_or_else(|| {
            hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "unknown-agent".to_string())
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cpu_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_interval_ms)
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::All)
    }
}
