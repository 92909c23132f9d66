use crate::models::MergedRow;
use tracing::instrument;

/// Sort rows by category, then type, then product name.
///
/// The sort is stable: rows with equal keys keep their input order.
#[instrument(name = "Sorting rows", skip_all)]
pub fn sort_rows(mut rows: Vec<MergedRow>) -> Vec<MergedRow> {
    rows.sort_by_cached_key(sort_key);
    rows
}

pub(crate) fn sort_key(row: &MergedRow) -> (String, String, String) {
    (
        collation_key(&row.category),
        collation_key(&row.product_type),
        collation_key(&row.product_name),
    )
}

/// Case-insensitive, whitespace-trimmed comparison key. `ё` sorts with `е`,
/// as in Russian dictionary order.
pub(crate) fn collation_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}
