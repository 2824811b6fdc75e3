use anyhow::Result;

use crate::transit::LineColor;

/// Source of the CTA line pages that list each line's stops.
#[async_trait::async_trait]
pub trait LinePages: Send + Sync {
    /// Returns the HTML of `line`'s page.
    async fn line_page(&self, line: LineColor) -> Result<String>;
}
