use super::*;
use crate::errors::CollectorError;
use crate::exposition::{find, LabelFilter};
use crate::source::MetricsSource;
use async_trait::async_trait;
use std::sync::Arc;

pub struct LoadCollector {
    source: Arc<dyn MetricsSource>,
}

impl LoadCollector {
    pub fn new(source: Arc<dyn MetricsSource>) -> Self {
        Self { source }
    }

    fn build(text: &str) -> LoadReport {
        let any = LabelFilter::new();
        let load = |metric: &str| find(text, metric, &any).map(round2);
        LoadReport {
            load_1min: load("node_load1"),
            load_5min: load("node_load5"),
            load_15min: load("node_load15"),
        }
    }
}

#[async_trait]
impl Collector for LoadCollector {
    type Report = LoadReport;

    fn name(&self) -> &'static str {
        "load"
    }

    async fn collect(&self) -> Result<LoadReport, CollectorError> {
        let text = self.source.fetch().await?;
        Ok(Self::build(&text))
    }
}
