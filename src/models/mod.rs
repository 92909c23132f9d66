pub mod catalog;
pub mod listing;
pub mod row;

pub use catalog::CatalogRecord;
pub use listing::ListingRecord;
pub use row::{MergedRow, ToSheetRows};
