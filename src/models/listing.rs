use crate::ozon::types::OzonPrice;
use rust_decimal::Decimal;

/// One product offer in a seller cabinet, with the prices Ozon reports for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub cabinet_label: String,
    pub offer_id: String,
    pub price_before_discount: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub seller_marketing_price: Option<Decimal>,
    pub customer_price: Option<Decimal>,
}

impl ListingRecord {
    /// Build a listing from the price block Ozon returned for `offer_id`, if any.
    pub fn from_ozon(cabinet_label: &str, offer_id: String, price: Option<OzonPrice>) -> Self {
        let price = price.unwrap_or_default();
        ListingRecord {
            cabinet_label: cabinet_label.to_string(),
            offer_id,
            price_before_discount: price.old_price,
            min_price: price.min_price,
            seller_marketing_price: price.marketing_seller_price,
            customer_price: price.price,
        }
    }
}

/// Canonical form of a seller offer id.
///
/// Surrounding whitespace and a leading apostrophe (left behind by spreadsheet
/// text cells) are stripped. Purely numeric ids shorter than five characters
/// are left-padded with zeros, matching the articles kept in the inventory.
pub fn normalize_offer_id(raw: &str) -> String {
    let id = raw.trim();
    let id = id.strip_prefix('\'').unwrap_or(id).trim();

    if !id.is_empty() && id.len() < 5 && id.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>5}", id)
    } else {
        id.to_string()
    }
}
