use anyhow::Result;

use crate::health::HealthMetric;
use crate::parser::TractMetricRow;

/// Abstraction over the City Health Dashboard tract metrics.
#[async_trait::async_trait]
pub trait HealthApi: Send + Sync {
    /// Returns the Chicago tract estimates of `metric` for its data year.
    async fn tract_metric(&self, metric: HealthMetric) -> Result<Vec<TractMetricRow>>;
}
