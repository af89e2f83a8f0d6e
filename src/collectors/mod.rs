pub mod cpu;
pub mod disk;
pub mod load;
pub mod memory;

use crate::errors::CollectorError;
use async_trait::async_trait;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::time::Instant;
use tracing::{debug, warn};

#[async_trait]
pub trait Collector: Send + Sync {
    /// What a successful collection yields. `Default` is the degraded form.
    type Report: Default + Send;

    /// name of the collector as used in logs
    fn name(&self) -> &'static str;

    /// fetch fresh exposition text and derive the report.
    async fn collect(&self) -> Result<Self::Report, CollectorError>;
}

/// Runs a collector, swallowing any failure into the degraded report.
pub async fn collect_or_degrade<C: Collector>(collector: &C) -> C::Report {
    let started = Instant::now();
    let result = collector.collect().await;
    let latency_us = started.elapsed().as_micros() as u64;

    match result {
        Ok(report) => {
            debug!(collector = collector.name(), latency_us, "collected");
            report
        }
        Err(e) => {
            warn!(
                collector = collector.name(),
                latency_us,
                error = %e,
                transport = e.is_transport(),
                "collection failed, returning degraded report"
            );
            C::Report::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuReport {
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemoryReport {
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub used_bytes: u64,
    pub used_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskReport {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub used_percent: f64,
}

/// Load averages; each field is independent and omitted when absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_1min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_5min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_15min: Option<f64>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.load_1min.is_none() && self.load_5min.is_none() && self.load_15min.is_none()
    }
}

/// Aggregate of all sub-reports. Memory and disk are all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostMetricsReport {
    pub cpu: CpuReport,
    #[serde(serialize_with = "or_empty")]
    pub memory: Option<MemoryReport>,
    #[serde(serialize_with = "or_empty")]
    pub disk: Option<DiskReport>,
    pub load: LoadReport,
}

/// Serializes `None` as an empty JSON object rather than `null`.
pub struct OrEmpty<'a, T>(pub &'a Option<T>);

impl<T: Serialize> Serialize for OrEmpty<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(report) => report.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

fn or_empty<T: Serialize, S: Serializer>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error> {
    OrEmpty(value).serialize(serializer)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// (total, remaining, used, used_percent) from raw gauge values.
pub(crate) fn usage_split(total: f64, remaining: f64) -> (u64, u64, u64, f64) {
    let total = total as u64;
    let remaining = remaining as u64;
    let used = total.saturating_sub(remaining);
    let pct = if total > 0 {
        round2(used as f64 / total as f64 * 100.0)
    } else {
        0.0
    };
    (total, remaining, used, pct)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.256), 1.26);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(75.0), 75.0);
    }

    #[test]
    fn test_usage_split() {
        assert_eq!(usage_split(1000.0, 250.0), (1000, 250, 750, 75.0));
        assert_eq!(usage_split(0.0, 0.0), (0, 0, 0, 0.0));
    }

    #[test]
    fn test_absent_reports_serialize_as_empty_objects() {
        let report = HostMetricsReport::default();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cpu": { "usage_percent": 0.0 },
                "memory": {},
                "disk": {},
                "load": {},
            })
        );
    }
}
