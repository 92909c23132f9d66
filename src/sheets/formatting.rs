use crate::error::{AppError, Result};
use crate::models::MergedRow;
use crate::models::row::HEADERS;
use google_sheets4::FieldMask;
use google_sheets4::api::{
    AddConditionalFormatRuleRequest, AddProtectedRangeRequest, BooleanCondition, BooleanRule,
    CellData, CellFormat, Color, ConditionValue, ConditionalFormatRule,
    DeleteConditionalFormatRuleRequest, DeleteProtectedRangeRequest, GridProperties, GridRange,
    ProtectedRange, RepeatCellRequest, Request, Sheet, SheetProperties, TextFormat,
    UpdateSheetPropertiesRequest,
};

const PROTECTION_DESCRIPTION: &str = "Managed by ozon-price-sheet";

/// Make header row bold.
pub(super) fn bold_header_rule(sheet_id: i32) -> Request {
    Request {
        repeat_cell: Some(RepeatCellRequest {
            range: Some(GridRange {
                sheet_id: Some(sheet_id),
                start_row_index: Some(0),
                end_row_index: Some(1),
                start_column_index: None,
                end_column_index: None,
            }),
            cell: Some(CellData {
                user_entered_format: Some(CellFormat {
                    text_format: Some(TextFormat {
                        bold: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&["userEnteredFormat.textFormat.bold"])),
        }),
        ..Default::default()
    }
}

/// Freeze header row.
pub(super) fn freeze_header_rule(sheet_id: i32) -> Request {
    Request {
        update_sheet_properties: Some(UpdateSheetPropertiesRequest {
            properties: Some(SheetProperties {
                sheet_id: Some(sheet_id),
                grid_properties: Some(GridProperties {
                    frozen_row_count: Some(1),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            fields: Some(FieldMask::new(&["gridProperties.frozenRowCount"])),
        }),
        ..Default::default()
    }
}

/// Highlight listings that have no product in the inventory catalog:
/// "offer_id" is filled but the catalog product name is blank.
pub(super) fn highlight_rules(sheet_id: i32, sheet: &Sheet) -> Result<Vec<Request>> {
    let mut requests = Vec::new();

    let light_yellow = Color {
        red: Some(0.988),
        green: Some(0.910),
        blue: Some(0.698),
        alpha: Some(1.0),
    };
    let offer_id_column = MergedRow::get_column_letter("offer_id")
        .ok_or_else(|| AppError::Sheets("offer_id column not found".to_string()))?;
    let name_column = MergedRow::get_column_letter(HEADERS[3])
        .ok_or_else(|| AppError::Sheets("Product name column not found".to_string()))?;

    for _ in sheet
        .conditional_formats
        .as_deref()
        .unwrap_or_default()
        .iter()
    {
        requests.push(Request {
            delete_conditional_format_rule: Some(DeleteConditionalFormatRuleRequest {
                index: Some(0), // Delete the first rule repeatedly
                sheet_id: Some(sheet_id),
            }),
            ..Default::default()
        });
    }

    requests.push(Request {
        add_conditional_format_rule: Some(AddConditionalFormatRuleRequest {
            index: Some(0),
            rule: Some(ConditionalFormatRule {
                ranges: Some(vec![GridRange {
                    sheet_id: Some(sheet_id),
                    start_row_index: Some(1), // Skip header row
                    end_row_index: None,
                    start_column_index: Some(0),
                    end_column_index: Some(HEADERS.len() as i32),
                }]),
                boolean_rule: Some(BooleanRule {
                    condition: Some(BooleanCondition {
                        type_: Some("CUSTOM_FORMULA".to_string()),
                        values: Some(vec![ConditionValue {
                            user_entered_value: Some(format!(
                                "=AND(NOT(ISBLANK(${}2)), ISBLANK(${}2))",
                                offer_id_column, name_column,
                            )),
                            ..Default::default()
                        }]),
                    }),
                    format: Some(CellFormat {
                        background_color: Some(light_yellow),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            }),
        }),
        ..Default::default()
    });

    Ok(requests)
}

/// Warn before manual edits to the columns this tool rewrites on every run.
pub(super) fn protection_rules(sheet_id: i32, sheet: &Sheet) -> Vec<Request> {
    let mut requests: Vec<Request> = sheet
        .protected_ranges
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|range| range.description.as_deref() == Some(PROTECTION_DESCRIPTION))
        .filter_map(|range| range.protected_range_id)
        .map(|id| Request {
            delete_protected_range: Some(DeleteProtectedRangeRequest {
                protected_range_id: Some(id),
            }),
            ..Default::default()
        })
        .collect();

    requests.push(Request {
        add_protected_range: Some(AddProtectedRangeRequest {
            protected_range: Some(ProtectedRange {
                range: Some(GridRange {
                    sheet_id: Some(sheet_id),
                    start_column_index: Some(0),
                    end_column_index: Some(HEADERS.len() as i32),
                    ..Default::default()
                }),
                description: Some(PROTECTION_DESCRIPTION.to_string()),
                warning_only: Some(true),
                ..Default::default()
            }),
        }),
        ..Default::default()
    });

    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_header_rule() {
        let req = bold_header_rule(123);
        let repeat_cell = req.repeat_cell.unwrap();
        assert_eq!(repeat_cell.range.unwrap().sheet_id, Some(123));
        assert!(
            repeat_cell
                .cell
                .unwrap()
                .user_entered_format
                .unwrap()
                .text_format
                .unwrap()
                .bold
                .unwrap()
        );
    }

    #[test]
    fn test_freeze_header_rule() {
        let req = freeze_header_rule(123);
        let props = req.update_sheet_properties.unwrap().properties.unwrap();
        assert_eq!(props.sheet_id, Some(123));
        assert_eq!(props.grid_properties.unwrap().frozen_row_count, Some(1));
    }

    #[test]
    fn test_highlight_rules() {
        let sheet = Sheet {
            conditional_formats: Some(vec![
                ConditionalFormatRule::default(),
                ConditionalFormatRule::default(),
            ]),
            ..Default::default()
        };

        let reqs = highlight_rules(123, &sheet).unwrap();
        assert_eq!(reqs.len(), 3, "should have 3 requests, got {:?}", reqs);

        for req in &reqs[..2] {
            let delete = req.delete_conditional_format_rule.as_ref().unwrap();
            assert_eq!(delete.sheet_id, Some(123));
            assert_eq!(delete.index, Some(0));
        }

        let rule = reqs[2]
            .add_conditional_format_rule
            .as_ref()
            .unwrap()
            .rule
            .as_ref()
            .unwrap();
        let condition = rule
            .boolean_rule
            .as_ref()
            .unwrap()
            .condition
            .as_ref()
            .unwrap();

        assert_eq!(condition.type_.as_deref(), Some("CUSTOM_FORMULA"));
        let formula = condition.values.as_ref().unwrap()[0]
            .user_entered_value
            .as_ref()
            .unwrap();
        assert_eq!(formula, "=AND(NOT(ISBLANK($E2)), ISBLANK($D2))");
    }

    #[test]
    fn test_protection_rules_replace_only_own_ranges() {
        let sheet = Sheet {
            protected_ranges: Some(vec![
                ProtectedRange {
                    protected_range_id: Some(222),
                    description: Some(PROTECTION_DESCRIPTION.to_string()),
                    ..Default::default()
                },
                ProtectedRange {
                    protected_range_id: Some(333),
                    description: Some("Someone else's".to_string()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };

        let reqs = protection_rules(111, &sheet);
        assert_eq!(reqs.len(), 2, "should have 2 requests, got {:?}", reqs);

        let delete = reqs[0].delete_protected_range.as_ref().unwrap();
        assert_eq!(delete.protected_range_id, Some(222));

        let protected_range = reqs[1]
            .add_protected_range
            .as_ref()
            .unwrap()
            .protected_range
            .as_ref()
            .unwrap();
        assert_eq!(protected_range.warning_only, Some(true));

        let range = protected_range.range.as_ref().unwrap();
        assert_eq!(range.sheet_id, Some(111));
        assert_eq!(range.start_column_index, Some(0));
        assert_eq!(range.end_column_index, Some(10));
    }
}
