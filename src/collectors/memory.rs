use super::*;
use super::{Collector, MemoryReport};
use crate::errors::CollectorError;
use crate::exposition::{find, LabelFilter};
use crate::source::MetricsSource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

const MEM_TOTAL: &str = "node_memory_MemTotal_bytes";
const MEM_AVAILABLE: &str = "node_memory_MemAvailable_bytes";

/// Memory usage from node exporter meminfo gauges.
pub struct MemoryCollector {
    source: Arc<dyn MetricsSource>,
}

impl MemoryCollector {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self { source }
    }

    /// Total and available are only meaningful together; either missing gives `None`.
    fn build(text: &str) -> Option<MemoryReport> {
        let any = LabelFilter::new();
        let (Some(total), Some(available)) =
            (find(text, MEM_TOTAL, &any), find(text, MEM_AVAILABLE, &any))
        else {
            warn!("memory metrics not found");
            return None;
        };

        let (total_bytes, available_bytes, used_bytes, used_percent) =
            usage_split(total, available);
        Some(MemoryReport {
            total_bytes,
            available_bytes,
            used_bytes,
            used_percent,
        })
    }
}

#[async_trait]
impl Collector for MemoryCollector {
    type Report = Option<MemoryReport>;

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn collect(&self) -> Result<Option<MemoryReport>, CollectorError> {
        let text = self.source.fetch().await?;
        Ok(Self::build(&text))
    }
}
