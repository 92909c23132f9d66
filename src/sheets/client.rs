use super::{SheetOperations, a1_range};
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use crate::models::row::HEADERS;
use crate::models::{MergedRow, ToSheetRows};
use crate::sheets::auth::create_and_verify_authenticator;
use crate::sheets::formatting::{
    bold_header_rule, freeze_header_rule, highlight_rules, protection_rules,
};
use async_trait::async_trait;
use google_sheets4::api::Sheets;
use google_sheets4::api::{
    AddSheetRequest, BatchUpdateSpreadsheetRequest, ClearValuesRequest, GridProperties, Request,
    Scope, Sheet, SheetProperties, ValueRange,
};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use tracing::{debug, instrument};

// Read and write access to spreadsheets shared with the service account
pub(crate) const AUTH_SCOPE: Scope = Scope::Spreadsheet;

// Initial grid size for a newly created tab
const NEW_SHEET_ROWS: i32 = 2000;
const NEW_SHEET_COLUMNS: i32 = 20;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    spreadsheet_id: String,
}

impl SheetsClient {
    /// Create a new SheetsClient with authenticated access
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(config: &GoogleConfig) -> Result<Self> {
        let auth = create_and_verify_authenticator(config).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
            spreadsheet_id: config.spreadsheet_id.clone(),
        })
    }

    pub fn spreadsheet_url(&self) -> String {
        format!("https://docs.google.com/spreadsheets/d/{}", self.spreadsheet_id)
    }

    async fn get_sheet(&self, sheet_name: &str) -> Result<Option<Sheet>> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .include_grid_data(false)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to get spreadsheet: {}", e)))?;

        let sheet = spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .find(|sheet| {
                sheet
                    .properties
                    .as_ref()
                    .map(|props| props.title.as_deref() == Some(sheet_name))
                    .unwrap_or(false)
            });

        Ok(sheet)
    }

    async fn create_sheet(&self, sheet_name: &str) -> Result<Sheet> {
        let request = Request {
            add_sheet: Some(AddSheetRequest {
                properties: Some(SheetProperties {
                    title: Some(sheet_name.to_string()),
                    sheet_type: Some("GRID".to_string()),
                    grid_properties: Some(GridProperties {
                        row_count: Some(NEW_SHEET_ROWS),
                        column_count: Some(NEW_SHEET_COLUMNS),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };

        let batch_update = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![request]),
            include_spreadsheet_in_response: Some(false),
            response_include_grid_data: Some(false),
            ..Default::default()
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .batch_update(batch_update, &self.spreadsheet_id)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to create sheet: {}", e)))?;

        let sheet_properties = response
            .replies
            .and_then(|replies| replies.into_iter().next())
            .and_then(|reply| reply.add_sheet)
            .and_then(|add_sheet| add_sheet.properties)
            .ok_or_else(|| {
                AppError::Sheets("Failed to get sheet properties from create response".to_string())
            })?;

        Ok(Sheet {
            properties: Some(sheet_properties),
            ..Default::default()
        })
    }

    async fn apply_formatting(&self, sheet: &Sheet) -> Result<()> {
        let sheet_id = sheet
            .properties
            .as_ref()
            .and_then(|p| p.sheet_id)
            .ok_or_else(|| AppError::Sheets("Sheet ID not found".to_string()))?;

        let mut requests = vec![bold_header_rule(sheet_id), freeze_header_rule(sheet_id)];
        requests.extend(highlight_rules(sheet_id, sheet)?);
        requests.extend(protection_rules(sheet_id, sheet));

        let batch_update = BatchUpdateSpreadsheetRequest {
            requests: Some(requests),
            ..Default::default()
        };

        self.hub
            .spreadsheets()
            .batch_update(batch_update, &self.spreadsheet_id)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to apply formatting: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Ensuring sheet exists", skip(self))]
    async fn ensure_sheet(&self, sheet_name: &str) -> Result<Sheet> {
        let (sheet, created) = match self.get_sheet(sheet_name).await? {
            Some(sheet) => (sheet, false),
            None => (self.create_sheet(sheet_name).await?, true),
        };
        let sheet_id = sheet.properties.as_ref().and_then(|p| p.sheet_id);
        match created {
            true => debug!(?sheet_id, "Created sheet"),
            false => debug!(?sheet_id, "Found existing sheet"),
        }

        Ok(sheet)
    }

    #[instrument(name = "Writing sheet", skip(self, sheet, rows), fields(rows = rows.len()))]
    async fn write_sheet(&self, sheet: &Sheet, sheet_name: &str, rows: &[MergedRow]) -> Result<()> {
        // Clear the entire tab first
        let range_to_clear = a1_range(sheet_name, "");
        let clear_request = ClearValuesRequest::default();

        self.hub
            .spreadsheets()
            .values_clear(clear_request, &self.spreadsheet_id, &range_to_clear)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to clear sheet: {}", e)))?;

        let values = rows.to_sheet_rows();
        debug!(columns = HEADERS.len(), rows = values.len(), "Prepared sheet values");

        let data_range = a1_range(sheet_name, "A1");
        let value_range = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(data_range.clone()),
            values: Some(values),
        };

        // RAW keeps offer ids such as "00022" as text
        self.hub
            .spreadsheets()
            .values_update(value_range, &self.spreadsheet_id, &data_range)
            .value_input_option("RAW")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| AppError::Sheets(format!("Failed to write rows: {}", e)))?;

        self.apply_formatting(sheet).await?;

        Ok(())
    }
}
