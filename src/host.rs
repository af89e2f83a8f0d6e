//! Public host-metrics operations.
//!
//! Every operation re-fetches the exposition text and never fails: transport
//! errors and missing metrics both come back as empty or zeroed reports. The
//! `try_*` variants keep the distinction for callers that need it.

use crate::collectors::cpu::CpuCollector;
use crate::collectors::disk::DiskCollector;
use crate::collectors::load::LoadCollector;
use crate::collectors::memory::MemoryCollector;
use crate::collectors::{
    collect_or_degrade, Collector, CpuReport, DiskReport, HostMetricsReport, LoadReport,
    MemoryReport,
};
use crate::errors::CollectorError;
use crate::source::MetricsSource;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info_span, Instrument, Span};

pub const DEFAULT_CPU: &str = "0";
pub const DEFAULT_MOUNTPOINT: &str = "/";
pub const DEFAULT_CPU_INTERVAL: Duration = Duration::from_secs(1);

pub struct HostMetricsClient {
    source: Arc<dyn MetricsSource>,
    cpu_interval: Duration,
    span: Span,
}

impl HostMetricsClient {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        let span = info_span!("host_metrics", endpoint = %source.endpoint());
        Self {
            source,
            cpu_interval: DEFAULT_CPU_INTERVAL,
            span,
        }
    }

    /// Sampling interval used by [`get_all_metrics`](Self::get_all_metrics).
    pub fn with_cpu_interval(mut self, interval: Duration) -> Self {
        self.cpu_interval = interval;
        self
    }

    /// CPU, memory, disk and load in that order. Each part degrades on its own.
    pub async fn get_all_metrics(&self, cpu: &str, mountpoint: &str) -> HostMetricsReport {
        HostMetricsReport {
            cpu: CpuReport {
                usage_percent: self.get_cpu_usage(cpu, self.cpu_interval).await,
            },
            memory: self.get_memory_usage().await,
            disk: self.get_disk_usage(mountpoint).await,
            load: self.get_load_average().await,
        }
    }

    pub async fn get_cpu_usage(&self, cpu: &str, interval: Duration) -> f64 {
        let collector = CpuCollector::new(self.source.clone(), cpu, interval);
        self.degrade(&collector).await.usage_percent
    }

    pub async fn get_memory_usage(&self) -> Option<MemoryReport> {
        self.degrade(&MemoryCollector::new(self.source.clone())).await
    }

    pub async fn get_disk_usage(&self, mountpoint: &str) -> Option<DiskReport> {
        self.degrade(&DiskCollector::new(self.source.clone(), mountpoint))
            .await
    }

    pub async fn get_load_average(&self) -> LoadReport {
        self.degrade(&LoadCollector::new(self.source.clone())).await
    }

    pub async fn try_cpu_usage(&self, cpu: &str, interval: Duration) -> Result<f64, CollectorError> {
        let collector = CpuCollector::new(self.source.clone(), cpu, interval);
        Ok(self.attempt(&collector).await?.usage_percent)
    }

    pub async fn try_memory_usage(&self) -> Result<Option<MemoryReport>, CollectorError> {
        self.attempt(&MemoryCollector::new(self.source.clone())).await
    }

    pub async fn try_disk_usage(&self, mountpoint: &str) -> Result<Option<DiskReport>, CollectorError> {
        self.attempt(&DiskCollector::new(self.source.clone(), mountpoint))
            .await
    }

    pub async fn try_load_average(&self) -> Result<LoadReport, CollectorError> {
        self.attempt(&LoadCollector::new(self.source.clone())).await
    }

    async fn degrade<C: Collector>(&self, collector: &C) -> C::Report {
        collect_or_degrade(collector)
            .instrument(info_span!(parent: &self.span, "collect", collector = collector.name()))
            .await
    }

    async fn attempt<C: Collector>(&self, collector: &C) -> Result<C::Report, CollectorError> {
        collector
            .collect()
            .instrument(info_span!(parent: &self.span, "collect", collector = collector.name()))
            .await
    }
}
