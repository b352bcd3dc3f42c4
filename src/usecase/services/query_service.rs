use crate::domain::entities::specification::{ColumnLayout, Specification};
use crate::error::{Error, Result};

/// Resolves the quantity recorded against a named line item.
///
/// Groups are scanned in order, then items within a group in order; the
/// first item whose name cell equals `item_name` (exact, trimmed) wins.
/// Item names are assumed unique within the queried scope; when they are
/// not, first match in document order is the documented policy.
pub fn quantity_of(spec: &Specification, item_name: &str, layout: &ColumnLayout) -> Result<i64> {
    let wanted = item_name.trim();

    for group in &spec.groups {
        for item in &group.items {
            if item.name(layout) != Some(wanted) {
                continue;
            }
            let raw = item.quantity_raw(layout).unwrap_or("");
            return raw.parse::<i64>().map_err(|_| Error::QuantityParse {
                group: group.name.clone(),
                item: wanted.to_string(),
                raw: raw.to_string(),
            });
        }
    }

    Err(Error::ItemNotFound {
        group: "any group".to_string(),
        item: wanted.to_string(),
    })
}

/// Tests whether `value` occurs as an exact, trimmed cell value anywhere in
/// the flattened rows. Not a substring match.
pub fn contains_value(rows: &[Vec<String>], value: &str) -> bool {
    let wanted = value.trim();
    rows.iter()
        .any(|cells| cells.iter().any(|cell| cell.trim() == wanted))
}
