use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Serialize)]
pub(super) struct VisibilityFilter {
    pub(super) visibility: &'static str,
}

// https://docs.ozon.ru/api/seller/#operation/ProductAPI_GetProductList
#[derive(Debug, Serialize)]
pub(super) struct ProductListRequest<'a> {
    pub(super) filter: VisibilityFilter,
    pub(super) last_id: &'a str,
    pub(super) limit: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductListResponse {
    #[serde(default)]
    pub(super) result: ProductListResult,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProductListResult {
    #[serde(default)]
    pub(super) items: Vec<ProductListItem>,
    #[serde(default)]
    pub(super) last_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductListItem {
    pub(super) offer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PricesFilter<'a> {
    pub(super) offer_id: &'a [String],
    pub(super) visibility: &'static str,
}

// https://docs.ozon.ru/api/seller/#operation/ProductAPI_GetProductInfoPrices
#[derive(Debug, Serialize)]
pub(super) struct PricesRequest<'a> {
    pub(super) filter: PricesFilter<'a>,
    pub(super) last_id: &'a str,
    pub(super) limit: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct PricesResponse {
    #[serde(default)]
    pub(super) items: Vec<PriceItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PriceItem {
    pub(super) offer_id: Option<String>,
    #[serde(default)]
    pub(super) price: OzonPrice,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OzonPrice {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub old_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub marketing_seller_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Option<Decimal>,
}

/// Ozon sends prices as numbers on newer endpoints and as strings on older
/// ones, sometimes empty.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return Ok(None),
    };

    if raw.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::dec;
    use serde_json::json;

    #[test]
    fn test_price_from_numbers_and_strings() {
        let price: OzonPrice = serde_json::from_value(json!({
            "old_price": 2000,
            "min_price": "900.50",
            "marketing_seller_price": 1500.25,
            "price": ""
        }))
        .unwrap();

        assert_eq!(
            price,
            OzonPrice {
                old_price: Some(dec!(2000)),
                min_price: Some(dec!(900.50)),
                marketing_seller_price: Some(dec!(1500.25)),
                price: None,
            }
        );
    }

    #[test]
    fn test_price_with_missing_and_null_fields() {
        let price: OzonPrice = serde_json::from_value(json!({ "price": null })).unwrap();
        assert_eq!(price, OzonPrice::default());
    }

    #[test]
    fn test_price_rejects_garbage() {
        let result = serde_json::from_value::<OzonPrice>(json!({ "price": "abc" }));
        assert!(result.is_err());
    }
}
