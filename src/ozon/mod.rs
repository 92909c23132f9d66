mod client;
pub mod types;
pub use client::OzonClient;

use crate::error::Result;
use crate::models::ListingRecord;

use async_trait::async_trait;

/// A seller cabinet that can report its listings with current prices.
#[async_trait]
pub trait ListingSource {
    fn cabinet_label(&self) -> &str;

    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>>;
}
