use super::ListingSource;
use crate::config::CabinetConfig;
use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::models::listing::normalize_offer_id;
use crate::ozon::types::{
    OzonPrice, PricesFilter, PricesRequest, PricesResponse, ProductListRequest,
    ProductListResponse, VisibilityFilter,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

const OZON_BASE_URL: &str = "https://api-seller.ozon.ru";
const PRODUCT_LIST_PAGE_SIZE: u32 = 1000;
const PRICES_CHUNK_SIZE: usize = 1000;

pub struct OzonClient {
    client: Client,
    base_url: String,
    cabinet: CabinetConfig,
}

impl OzonClient {
    pub fn new(cabinet: &CabinetConfig, timeout: Duration) -> Result<Self> {
        Self::with_base_url(cabinet, timeout, OZON_BASE_URL)
    }

    pub(crate) fn with_base_url(
        cabinet: &CabinetConfig,
        timeout: Duration,
        base_url: &str,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cabinet: cabinet.clone(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.cabinet.client_id)
            .header("Api-Key", &self.cabinet.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Ozon(format!(
                "{} {} failed: {} - {}",
                self.cabinet.label, path, status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// Walk the product list by `last_id` cursor and collect normalised offer ids.
    #[instrument(name = "Fetching product list", skip_all)]
    async fn fetch_offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut last_id = String::new();

        loop {
            let request = ProductListRequest {
                filter: VisibilityFilter { visibility: "ALL" },
                last_id: &last_id,
                limit: PRODUCT_LIST_PAGE_SIZE,
            };
            let response: ProductListResponse = self.post("/v3/product/list", &request).await?;
            let page = response.result;

            if page.items.is_empty() {
                break;
            }

            offer_ids.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.offer_id)
                    .map(|offer_id| normalize_offer_id(&offer_id))
                    .filter(|offer_id| !offer_id.is_empty()),
            );

            if page.last_id.is_empty() || page.last_id == last_id {
                break;
            }
            last_id = page.last_id;
        }

        debug!(count = offer_ids.len(), "Fetched offer ids");

        Ok(offer_ids)
    }

    #[instrument(name = "Fetching prices", skip_all, fields(count = offer_ids.len()))]
    async fn fetch_prices(&self, offer_ids: &[String]) -> Result<HashMap<String, OzonPrice>> {
        let mut prices = HashMap::new();

        for chunk in offer_ids.chunks(PRICES_CHUNK_SIZE) {
            let request = PricesRequest {
                filter: PricesFilter {
                    offer_id: chunk,
                    visibility: "ALL",
                },
                last_id: "",
                limit: PRICES_CHUNK_SIZE as u32,
            };
            let response: PricesResponse =
                self.post("/v5/product/info/prices", &request).await?;

            for item in response.items {
                if let Some(offer_id) = item.offer_id {
                    prices.insert(normalize_offer_id(&offer_id), item.price);
                }
            }
        }

        Ok(prices)
    }
}

#[async_trait]
impl ListingSource for OzonClient {
    fn cabinet_label(&self) -> &str {
        &self.cabinet.label
    }

    #[instrument(name = "Fetching listings", skip_all, fields(cabinet = %self.cabinet.label))]
    async fn fetch_listings(&self) -> Result<Vec<ListingRecord>> {
        let offer_ids = self.fetch_offer_ids().await?;
        let prices = self.fetch_prices(&offer_ids).await?;

        let listings = offer_ids
            .into_iter()
            .map(|offer_id| {
                let price = prices.get(&offer_id).cloned();
                ListingRecord::from_ozon(&self.cabinet.label, offer_id, price)
            })
            .collect();

        Ok(listings)
    }
}
