mod cache;
mod client;
pub mod types;
pub use client::MoySkladClient;

use crate::error::Result;
use crate::models::CatalogRecord;

use async_trait::async_trait;
use std::collections::HashMap;

/// Inventory catalog keyed by product code.
#[async_trait]
pub trait CatalogSource {
    async fn fetch_catalog(&self) -> Result<HashMap<String, CatalogRecord>>;
}
