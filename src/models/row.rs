use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Number, Value};

/// Column titles of the destination tab, in write order.
pub const HEADERS: [&str; 10] = [
    "Cabinet",
    "Категория товара нижнего уровня",
    "Тип товара",
    "Название товара (МойСклад)",
    "offer_id",
    "Закупочная цена",
    "Цена до скидок",
    "Минимальная цена",
    "Ваша цена",
    "Цена для покупателя",
];

/// A listing joined with its catalog metadata. Metadata fields are empty when
/// the inventory has no product with the listing's offer id.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub cabinet: String,
    pub category: String,
    pub product_type: String,
    pub product_name: String,
    pub offer_id: String,
    pub purchase_price: Option<Decimal>,
    pub price_before_discount: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub seller_price: Option<Decimal>,
    pub customer_price: Option<Decimal>,
}

impl MergedRow {
    pub fn get_column_index(header: &str) -> Option<usize> {
        HEADERS.iter().position(|h| *h == header)
    }

    pub fn get_column_letter(header: &str) -> Option<char> {
        Self::get_column_index(header).map(|idx| (b'A' + idx as u8) as char)
    }

    fn to_cells(&self) -> Vec<Value> {
        vec![
            Value::String(self.cabinet.clone()),
            Value::String(self.category.clone()),
            Value::String(self.product_type.clone()),
            Value::String(self.product_name.clone()),
            Value::String(self.offer_id.clone()),
            price_cell(self.purchase_price),
            price_cell(self.price_before_discount),
            price_cell(self.min_price),
            price_cell(self.seller_price),
            price_cell(self.customer_price),
        ]
    }
}

pub trait ToSheetRows {
    /// Convert rows to sheet values, always including the header row.
    fn to_sheet_rows(&self) -> Vec<Vec<Value>>;
}

impl ToSheetRows for [MergedRow] {
    fn to_sheet_rows(&self) -> Vec<Vec<Value>> {
        let header: Vec<Value> = HEADERS.iter().map(|h| Value::from(*h)).collect();

        std::iter::once(header)
            .chain(self.iter().map(MergedRow::to_cells))
            .collect()
    }
}

/// Prices are written as numbers, integral when there is no fractional part.
/// A missing price is an empty cell.
fn price_cell(price: Option<Decimal>) -> Value {
    let Some(price) = price else {
        return Value::String(String::new());
    };

    let price = price.normalize();
    if price.scale() == 0 {
        if let Some(int) = price.to_i64() {
            return Value::from(int);
        }
    }

    price
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(price.to_string()))
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) fn mock_row(
        cabinet: &str,
        category: &str,
        type_: &str,
        name: &str,
        offer_id: &str,
    ) -> MergedRow {
        MergedRow {
            cabinet: cabinet.to_string(),
            category: category.to_string(),
            product_type: type_.to_string(),
            product_name: name.to_string(),
            offer_id: offer_id.to_string(),
            purchase_price: None,
            price_before_discount: None,
            min_price: None,
            seller_price: None,
            customer_price: None,
        }
    }
}
