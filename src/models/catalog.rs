use crate::moysklad::types::{MsAttribute, MsEntity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory-side description of a product, keyed by its article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub product_code: String,
    pub product_name: String,
    pub category_bottom_level: String,
    pub product_type: String,
    pub purchase_price: Option<Decimal>,
}

impl CatalogRecord {
    /// Convert a MoySklad product or bundle. Entities without an article cannot be
    /// joined to a listing and are skipped.
    pub fn from_entity(entity: MsEntity, type_attribute: &str) -> Option<Self> {
        let product_code = entity
            .article
            .map(|article| article.trim().to_string())
            .filter(|article| !article.is_empty())?;

        let product_type = entity
            .attributes
            .iter()
            .find(|attribute| attribute.name == type_attribute)
            .map(MsAttribute::display_value)
            .unwrap_or_default();

        Some(CatalogRecord {
            product_code,
            product_name: entity.name.unwrap_or_default(),
            category_bottom_level: bottom_level(entity.path_name.as_deref().unwrap_or_default()),
            product_type,
            // MoySklad keeps money in kopecks
            purchase_price: entity
                .buy_price
                .and_then(|price| price.value)
                .map(|value| value / Decimal::ONE_HUNDRED),
        })
    }
}

/// Leaf folder of a `/`-separated folder path.
fn bottom_level(path_name: &str) -> String {
    path_name
        .rsplit('/')
        .map(str::trim)
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_catalog_record(
        code: &str,
        category: &str,
        type_: &str,
        name: &str,
        purchase_price: Decimal,
    ) -> CatalogRecord {
        CatalogRecord {
            product_code: code.to_string(),
            product_name: name.to_string(),
            category_bottom_level: category.to_string(),
            product_type: type_.to_string(),
            purchase_price: Some(purchase_price),
        }
    }
}
