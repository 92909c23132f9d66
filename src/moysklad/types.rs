use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(super) struct ListResponse {
    #[serde(default)]
    pub(super) rows: Vec<MsEntity>,
}

// https://dev.moysklad.ru/doc/api/remap/1.2/dictionaries/#suschnosti-towar
// Products and bundles share the fields used here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MsEntity {
    pub name: Option<String>,
    pub article: Option<String>,
    pub path_name: Option<String>,
    pub buy_price: Option<MsPrice>,
    #[serde(default)]
    pub attributes: Vec<MsAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsPrice {
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MsAttribute {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl MsAttribute {
    /// Text shown for the attribute value. Reference values (custom entities,
    /// dictionaries) carry their display text under `name`.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Object(obj) => obj
                .get("name")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attribute(value: Value) -> MsAttribute {
        MsAttribute {
            name: "Тип товара".to_string(),
            value,
        }
    }

    #[test]
    fn test_display_value() {
        assert_eq!(attribute(json!(" Кружка ")).display_value(), "Кружка");
        assert_eq!(attribute(json!(42)).display_value(), "42");
        assert_eq!(attribute(json!(true)).display_value(), "true");
        assert_eq!(
            attribute(json!({ "meta": {}, "name": "Посуда" })).display_value(),
            "Посуда"
        );
        assert_eq!(attribute(Value::Null).display_value(), "");
    }
}
