mod sync;

use crate::error::Result;
use clap::Parser;

/// Takes no arguments: everything comes from the environment so the binary can
/// be run as-is from cron.
#[derive(Parser, Debug)]
#[command(name = "ozon-price-sheet")]
#[command(
    about = "Sync Ozon listings and prices with MoySklad product data into Google Sheets",
    long_about = None
)]
#[command(version)]
pub struct Cli {}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        sync::execute().await
    }
}
