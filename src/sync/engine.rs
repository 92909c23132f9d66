use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::moysklad::CatalogSource;
use crate::ozon::ListingSource;
use crate::sheets::SheetOperations;
use crate::sync::merge::merge_listings;
use crate::sync::order::sort_rows;
use indicatif::ProgressStyle;
use tracing::{Span, info, instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub struct SyncEngine<LS, CS, SC> {
    worksheet_name: String,
    listing_sources: Vec<LS>,
    catalog_source: CS,
    sheets_client: SC,
}

impl<LS, CS, SC> SyncEngine<LS, CS, SC>
where
    LS: ListingSource + Sync,
    CS: CatalogSource + Sync,
    SC: SheetOperations + Sync,
{
    pub fn new(
        worksheet_name: String,
        listing_sources: Vec<LS>,
        catalog_source: CS,
        sheets_client: SC,
    ) -> Self {
        Self {
            worksheet_name,
            listing_sources,
            catalog_source,
            sheets_client,
        }
    }

    /// Fetch every cabinet and the catalog, then replace the worksheet.
    ///
    /// The worksheet is only touched once all fetches have succeeded.
    /// Returns the number of data rows written.
    #[instrument(name = "Sync", skip_all, fields(worksheet = %self.worksheet_name))]
    pub async fn sync(&self) -> Result<usize> {
        let span = Span::current();
        span.pb_set_style(
            &ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
            )
            .map_err(|e| AppError::Other(e.into()))?,
        );
        span.pb_set_message("Fetching cabinets");

        if self.listing_sources.is_empty() {
            return Err(AppError::Config("No cabinets configured".to_string()));
        }

        // One step per cabinet, plus the catalog
        span.pb_set_length(self.listing_sources.len() as u64 + 1);

        let mut listings = Vec::new();
        for source in &self.listing_sources {
            listings.extend(self.fetch_cabinet(source).await?);
            span.pb_inc(1);
        }

        span.pb_set_message("Fetching catalog");
        let catalog = self.catalog_source.fetch_catalog().await?;
        span.pb_inc(1);

        let rows = sort_rows(merge_listings(&listings, &catalog));

        span.pb_set_message("Writing sheet");
        let sheet = self.sheets_client.ensure_sheet(&self.worksheet_name).await?;
        self.sheets_client
            .write_sheet(&sheet, &self.worksheet_name, &rows)
            .await?;

        info!(rows = rows.len(), "Sheet written");

        Ok(rows.len())
    }

    #[instrument(name = "Syncing cabinet", skip_all, fields(cabinet = %source.cabinet_label()))]
    async fn fetch_cabinet(&self, source: &LS) -> Result<Vec<ListingRecord>> {
        let listings = source.fetch_listings().await?;

        info!(listings = listings.len(), "Cabinet fetched");

        Ok(listings)
    }
}

#[cfg(test)]
mod mocks {
    use super::*;
    use crate::models::{CatalogRecord, MergedRow};
    use async_trait::async_trait;
    use google_sheets4::api::Sheet;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    pub(crate) struct MockListingSource {
        pub label: String,
        pub listings: Vec<ListingRecord>,
    }

    #[async_trait]
    impl ListingSource for MockListingSource {
        fn cabinet_label(&self) -> &str {
            &self.label
        }

        async fn fetch_listings(&self) -> Result<Vec<ListingRecord>> {
            Ok(self.listings.clone())
        }
    }

    pub(crate) struct MockCatalogSource {
        pub catalog: Option<HashMap<String, CatalogRecord>>,
    }

    #[async_trait]
    impl CatalogSource for MockCatalogSource {
        async fn fetch_catalog(&self) -> Result<HashMap<String, CatalogRecord>> {
            self.catalog
                .clone()
                .ok_or_else(|| AppError::MoySklad("/entity/product failed: 503".to_string()))
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct MockSheetsClient {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub written_rows: Arc<Mutex<Option<Vec<MergedRow>>>>,
    }

    #[async_trait]
    impl SheetOperations for MockSheetsClient {
        async fn ensure_sheet(&self, sheet_name: &str) -> Result<Sheet> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("ensure_sheet {sheet_name}"));
            Ok(Sheet::default())
        }

        async fn write_sheet(
            &self,
            _sheet: &Sheet,
            sheet_name: &str,
            rows: &[MergedRow],
        ) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("write_sheet {sheet_name}"));
            *self.written_rows.lock().unwrap() = Some(rows.to_vec());
            Ok(())
        }
    }

    pub(crate) fn cabinet(label: &str, listings: Vec<ListingRecord>) -> MockListingSource {
        MockListingSource {
            label: label.to_string(),
            listings,
        }
    }

    pub(crate) fn catalog(records: Vec<CatalogRecord>) -> MockCatalogSource {
        MockCatalogSource {
            catalog: Some(
                records
                    .into_iter()
                    .map(|r| (r.product_code.clone(), r))
                    .collect(),
            ),
        }
    }

    pub(crate) async fn sync_against_mocks(
        cabinets: Vec<MockListingSource>,
        catalog_source: MockCatalogSource,
    ) -> (Result<usize>, MockSheetsClient) {
        let sheets_client = MockSheetsClient::default();
        let engine = SyncEngine::new(
            "API Ozon".to_string(),
            cabinets,
            catalog_source,
            sheets_client.clone(),
        );
        let result = engine.sync().await;
        (result, sheets_client)
    }
}
