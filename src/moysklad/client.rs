use super::CatalogSource;
use super::cache::CatalogCache;
use crate::config::MoySkladConfig;
use crate::error::{AppError, Result};
use crate::models::CatalogRecord;
use crate::moysklad::types::{ListResponse, MsEntity};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument};

const MS_BASE_URL: &str = "https://api.moysklad.ru/api/remap/1.2";
const MS_ACCEPT: &str = "application/json;charset=utf-8";
const PAGE_SIZE: usize = 1000;
const ACTIVE_FILTER: &str = "archived=false";

pub struct MoySkladClient {
    client: Client,
    base_url: String,
    token: String,
    type_attribute: String,
    cache: Option<CatalogCache>,
}

impl MoySkladClient {
    pub fn new(config: &MoySkladConfig, timeout: Duration) -> Result<Self> {
        Self::with_base_url(config, timeout, MS_BASE_URL)
    }

    pub(crate) fn with_base_url(
        config: &MoySkladConfig,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let cache = config
            .cache_enabled()
            .then(|| CatalogCache::new(config.cache_path.clone(), config.cache_ttl));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            type_attribute: config.type_attribute.clone(),
            cache,
        })
    }

    async fn get_page(&self, path: &str, offset: usize) -> Result<ListResponse> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, MS_ACCEPT)
            .query(&[
                ("limit", PAGE_SIZE.to_string()),
                ("offset", offset.to_string()),
                ("filter", ACTIVE_FILTER.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MoySklad(format!(
                "{} failed: {} - {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Page through an entity collection until a short page comes back.
    #[instrument(name = "Listing entities", skip(self))]
    async fn list_all(&self, path: &str) -> Result<Vec<MsEntity>> {
        let mut entities = Vec::new();
        let mut offset = 0;

        loop {
            let page = self.get_page(path, offset).await?;
            let count = page.rows.len();
            entities.extend(page.rows);

            if count < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        debug!(count = entities.len(), "Fetched entities");

        Ok(entities)
    }

    async fn fetch_fresh(&self) -> Result<HashMap<String, CatalogRecord>> {
        let products = self.list_all("/entity/product").await?;
        let bundles = self.list_all("/entity/bundle").await?;

        let mut catalog = HashMap::new();

        for entity in products {
            if let Some(record) = CatalogRecord::from_entity(entity, &self.type_attribute) {
                catalog.insert(record.product_code.clone(), record);
            }
        }

        // A bundle never shadows a product with the same article
        for entity in bundles {
            if let Some(record) = CatalogRecord::from_entity(entity, &self.type_attribute) {
                catalog.entry(record.product_code.clone()).or_insert(record);
            }
        }

        Ok(catalog)
    }
}

#[async_trait]
impl CatalogSource for MoySkladClient {
    #[instrument(name = "Fetching catalog", skip_all)]
    async fn fetch_catalog(&self) -> Result<HashMap<String, CatalogRecord>> {
        if let Some(cached) = self.cache.as_ref().and_then(CatalogCache::load) {
            info!(count = cached.len(), "Using cached catalog");
            return Ok(cached);
        }

        let catalog = self.fetch_fresh().await?;

        if let Some(cache) = &self.cache {
            cache.save(&catalog)?;
        }

        info!(count = catalog.len(), "Catalog fetched");

        Ok(catalog)
    }
}
