use crate::config::Config;
use crate::error::Result;
use crate::moysklad::MoySkladClient;
use crate::ozon::OzonClient;
use crate::sheets::SheetsClient;
use crate::sync::SyncEngine;
use tracing::info;

pub async fn execute() -> Result<()> {
    let config = Config::load()?;

    let ozon_clients = config
        .cabinets
        .iter()
        .map(|cabinet| OzonClient::new(cabinet, config.http_timeout))
        .collect::<Result<Vec<_>>>()?;
    let moysklad_client = MoySkladClient::new(&config.moysklad, config.http_timeout)?;
    let sheets_client = SheetsClient::new(&config.google).await?;
    let url = sheets_client.spreadsheet_url();

    let engine = SyncEngine::new(
        config.google.worksheet_name.clone(),
        ozon_clients,
        moysklad_client,
        sheets_client,
    );
    let rows = engine.sync().await?;

    info!(url = url, rows = rows, "Sync completed");

    Ok(())
}
