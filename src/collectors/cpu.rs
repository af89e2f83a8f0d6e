use super::*;
use crate::errors::CollectorError;
use crate::exposition::{find, LabelFilter};
use crate::source::MetricsSource;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const CPU_SECONDS: &str = "node_cpu_seconds_total";

/// CPU utilization from two node exporter snapshots taken `interval` apart.
pub struct CpuCollector {
    source: Arc<dyn MetricsSource>,
    cpu: String,
    interval: Duration,
}

/// Cumulative seconds per mode for one logical CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuCounterSnapshot {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
}

impl CpuCounterSnapshot {
    pub fn total(&self) -> f64 {
        self.user + self.system + self.idle + self.iowait + self.irq + self.softirq
    }

    fn modes(&self) -> [(&'static str, f64); 6] {
        [
            ("user", self.user),
            ("system", self.system),
            ("idle", self.idle),
            ("iowait", self.iowait),
            ("irq", self.irq),
            ("softirq", self.softirq),
        ]
    }

    /// One lookup per mode; a mode without a record counts as 0.
    pub fn from_exposition(text: &str, cpu: &str) -> Self {
        let mode = |mode: &str| {
            let filter = LabelFilter::new().with("cpu", cpu).with("mode", mode);
            find(text, CPU_SECONDS, &filter).unwrap_or(0.0)
        };
        Self {
            user: mode("user"),
            system: mode("system"),
            idle: mode("idle"),
            iowait: mode("iowait"),
            irq: mode("irq"),
            softirq: mode("softirq"),
        }
    }
}

impl CpuCollector {
    pub fn new(source: Arc<dyn MetricsSource>, cpu: impl Into<String>, interval: Duration) -> Self {
        Self {
            source,
            cpu: cpu.into(),
            interval,
        }
    }

    async fn snapshot(&self) -> Result<CpuCounterSnapshot, CollectorError> {
        let text = self.source.fetch().await?;
        Ok(CpuCounterSnapshot::from_exposition(&text, &self.cpu))
    }

    /// Busy percentage between two snapshots, rounded to 2 decimals.
    ///
    /// A mode counter that decreased means the counters were reset and the
    /// pair is discarded. Non-positive total delta gives 0.
    fn usage(
        cpu: &str,
        prev: &CpuCounterSnapshot,
        curr: &CpuCounterSnapshot,
    ) -> Result<f64, CollectorError> {
        for ((mode, before), (_, after)) in prev.modes().into_iter().zip(curr.modes()) {
            if after < before {
                return Err(CollectorError::CounterReset {
                    cpu: cpu.to_string(),
                    mode,
                });
            }
        }

        let total_delta = curr.total() - prev.total();
        let idle_delta = curr.idle - prev.idle;
        if total_delta > 0.0 {
            let busy = 100.0 * (1.0 - idle_delta / total_delta);
            Ok(round2(busy.clamp(0.0, 100.0)))
        } else {
            Ok(0.0)
        }
    }
}

#[async_trait]
impl Collector for CpuCollector {
    type Report = CpuReport;

    fn name(&self) -> &'static str {
        "cpu"
    }

    async fn collect(&self) -> Result<CpuReport, CollectorError> {
        let first = self.snapshot().await?;
        tokio::time::sleep(self.interval).await;
        let second = self.snapshot().await?;

        let usage_percent = Self::usage(&self.cpu, &first, &second)?;
        debug!(
            cpu = %self.cpu,
            total_delta = second.total() - first.total(),
            usage_percent,
            "cpu sampled"
        );
        Ok(CpuReport { usage_percent })
    }
}

// ─────────────────────────────────────────────
// Unit tests — validate on hardcoded information
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::testing::{ScriptedSource, TimingOutSource};
    use tokio_test::{assert_err, assert_ok};

    fn exposition(cpu: &str, s: &CpuCounterSnapshot) -> String {
        s.modes()
            .iter()
            .map(|(mode, v)| {
                format!("node_cpu_seconds_total{{cpu=\"{cpu}\",mode=\"{mode}\"}} {v}\n")
            })
            .collect()
    }

    const PREV: CpuCounterSnapshot = CpuCounterSnapshot {
        user: 200.0,
        system: 100.0,
        idle: 100.0,
        iowait: 50.0,
        irq: 25.0,
        softirq: 25.0,
    };

    const CURR: CpuCounterSnapshot = CpuCounterSnapshot {
        user: 230.0,
        system: 120.0,
        idle: 150.0,
        iowait: 50.0,
        irq: 25.0,
        softirq: 25.0,
    };

    #[test]
    fn test_snapshot_from_exposition() {
        let text = format!("{}{}", exposition("1", &CURR), exposition("0", &PREV));
        let snap = CpuCounterSnapshot::from_exposition(&text, "0");
        assert_eq!(snap, PREV);
        assert_eq!(snap.total(), 500.0);
    }

    #[test]
    fn test_missing_modes_count_as_zero() {
        let text = "\
node_cpu_seconds_total{cpu=\"0\",mode=\"idle\"} 90
node_cpu_seconds_total{cpu=\"0\",mode=\"user\"} 10
node_cpu_seconds_total{cpu=\"0\",mode=\"nice\"} 5
";
        let snap = CpuCounterSnapshot::from_exposition(text, "0");
        assert_eq!(snap.idle, 90.0);
        assert_eq!(snap.user, 10.0);
        assert_eq!(snap.softirq, 0.0);
        assert_eq!(snap.total(), 100.0);
    }

    #[test]
    fn test_delta_computation() {
        assert_eq!(PREV.total(), 500.0);
        assert_eq!(CURR.total(), 600.0);
        let usage = assert_ok!(CpuCollector::usage("0", &PREV, &CURR));
        assert_eq!(usage, 50.0);
    }

    #[test]
    fn test_zero_total_delta_is_zero_usage() {
        let usage = assert_ok!(CpuCollector::usage("0", &PREV, &PREV));
        assert_eq!(usage, 0.0);
    }

    #[test]
    fn test_counter_reset_is_rejected() {
        let err = assert_err!(CpuCollector::usage("0", &CURR, &PREV));
        assert!(matches!(err, CollectorError::CounterReset { mode: "user", .. }));
    }

    #[tokio::test]
    async fn test_collect_samples_twice() {
        let source = Arc::new(ScriptedSource::new([
            exposition("0", &PREV),
            exposition("0", &CURR),
        ]));
        let collector = CpuCollector::new(source.clone(), "0", Duration::from_millis(5));
        let report = assert_ok!(collector.collect().await);
        assert_eq!(report.usage_percent, 50.0);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_zero() {
        let collector = CpuCollector::new(Arc::new(TimingOutSource), "0", Duration::ZERO);
        assert_err!(collector.collect().await);
        assert_eq!(collect_or_degrade(&collector).await.usage_percent, 0.0);
    }
}
