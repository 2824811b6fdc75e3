use anyhow::Result;

use crate::parser::StationRow;

/// Abstraction over the 'L' stops dataset of the city data portal.
#[async_trait::async_trait]
pub trait StationApi: Send + Sync {
    /// Returns every row of the stops dataset.
    async fn list_stations(&self) -> Result<Vec<StationRow>>;
}
