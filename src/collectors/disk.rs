use super::*;
use crate::errors::CollectorError;
use crate::exposition::{find, LabelFilter};
use crate::source::MetricsSource;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

const FS_SIZE: &str = "node_filesystem_size_bytes";
const FS_FREE: &str = "node_filesystem_free_bytes";

/// Filesystem usage for one mountpoint.
pub struct DiskCollector {
    source: Arc<dyn MetricsSource>,
    mountpoint: String,
}

impl DiskCollector {
    pub fn new(source: Arc<dyn MetricsSource>, mountpoint: impl Into<String>) -> Self {
        Self {
            source,
            mountpoint: mountpoint.into(),
        }
    }

    fn build(text: &str, mountpoint: &str) -> Option<DiskReport> {
        let filter = LabelFilter::new().with("mountpoint", mountpoint);
        let (Some(size), Some(free)) = (find(text, FS_SIZE, &filter), find(text, FS_FREE, &filter))
        else {
            warn!(mountpoint, "disk metrics not found");
            return None;
        };

        let (total_bytes, free_bytes, used_bytes, used_percent) = usage_split(size, free);
        Some(DiskReport {
            total_bytes,
            free_bytes,
            used_bytes,
            used_percent,
        })
    }
}

#[async_trait]
impl Collector for DiskCollector {
    type Report = Option<DiskReport>;

    fn name(&self) -> &'static str {
        "disk"
    }

    async fn collect(&self) -> Result<Option<DiskReport>, CollectorError> {
        let text = self.source.fetch().await?;
        Ok(Self::build(&text, &self.mountpoint))
    }
}
