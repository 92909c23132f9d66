use crate::error::Result;
use crate::models::CatalogRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    fetched_at: DateTime<Utc>,
    records: HashMap<String, CatalogRecord>,
}

/// On-disk copy of the last fetched catalog, reused while younger than `ttl`.
pub(super) struct CatalogCache {
    path: PathBuf,
    ttl: Duration,
}

impl CatalogCache {
    pub(super) fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    pub(super) fn load(&self) -> Option<HashMap<String, CatalogRecord>> {
        self.load_at(Utc::now())
    }

    /// A missing, unreadable or stale cache is a miss, never an error.
    fn load_at(&self, now: DateTime<Utc>) -> Option<HashMap<String, CatalogRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = ?self.path, "Catalog cache not readable: {}", e);
                return None;
            }
        };

        let cache: CacheFile = match serde_json::from_str(&contents) {
            Ok(cache) => cache,
            Err(e) => {
                debug!(path = ?self.path, "Catalog cache not parseable: {}", e);
                return None;
            }
        };

        let fresh = now
            .signed_duration_since(cache.fetched_at)
            .to_std()
            .map(|age| age <= self.ttl)
            .unwrap_or(false);

        if !fresh {
            debug!(fetched_at = %cache.fetched_at, "Catalog cache is stale");
            return None;
        }

        Some(cache.records)
    }

    pub(super) fn save(&self, records: &HashMap<String, CatalogRecord>) -> Result<()> {
        self.save_at(records, Utc::now())
    }

    fn save_at(&self, records: &HashMap<String, CatalogRecord>, now: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let cache = CacheFile {
            fetched_at: now,
            records: records.clone(),
        };
        fs::write(&self.path, serde_json::to_string(&cache)?)?;

        debug!(path = ?self.path, count = records.len(), "Saved catalog cache");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::test_helpers::mock_catalog_record;
    use chrono::TimeDelta;
    use rust_decimal::prelude::dec;
    use tempfile::TempDir;

    fn records() -> HashMap<String, CatalogRecord> {
        let record = mock_catalog_record("00022", "Кружки", "Кружка", "Кружка белая", dec!(125.5));
        HashMap::from([(record.product_code.clone(), record)])
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let dir = TempDir::new().unwrap();
        let cache = CatalogCache::new(dir.path().join("nested/ms_catalog.json"), Duration::from_secs(900));
        let saved_at = Utc::now();

        cache.save_at(&records(), saved_at).unwrap();
        let loaded = cache.load_at(saved_at + TimeDelta::seconds(60));

        assert_eq!(loaded, Some(records()));
    }

    #[test]
    fn test_stale_cache_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = CatalogCache::new(dir.path().join("ms_catalog.json"), Duration::from_secs(900));
        let saved_at = Utc::now();

        cache.save_at(&records(), saved_at).unwrap();

        assert_eq!(cache.load_at(saved_at + TimeDelta::seconds(901)), None);
    }

    #[test]
    fn test_missing_or_corrupt_cache_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ms_catalog.json");
        let cache = CatalogCache::new(path.clone(), Duration::from_secs(900));

        assert_eq!(cache.load(), None);

        fs::write(&path, "{not json").unwrap();
        assert_eq!(cache.load(), None);
    }
}
