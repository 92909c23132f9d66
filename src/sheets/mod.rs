mod auth;
mod client;
mod formatting;

pub use client::SheetsClient;

use crate::error::Result;
use crate::models::MergedRow;
use async_trait::async_trait;
use google_sheets4::api::Sheet;

#[async_trait]
pub trait SheetOperations {
    async fn ensure_sheet(&self, sheet_name: &str) -> Result<Sheet>;

    /// Replace the whole tab with a header row followed by `rows`.
    async fn write_sheet(
        &self,
        sheet: &Sheet,
        sheet_name: &str,
        rows: &[MergedRow],
    ) -> Result<()>;
}

/// A1 notation for `cells` on a tab, quoting the tab name.
pub(crate) fn a1_range(sheet_name: &str, cells: &str) -> String {
    let quoted = format!("'{}'", sheet_name.replace('\'', "''"));
    match cells.is_empty() {
        true => quoted,
        false => format!("{}!{}", quoted, cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a1_range() {
        assert_eq!(a1_range("API Ozon", "A1"), "'API Ozon'!A1");
        assert_eq!(a1_range("API Ozon", ""), "'API Ozon'");
        assert_eq!(a1_range("Bob's prices", "A:J"), "'Bob''s prices'!A:J");
    }
}
