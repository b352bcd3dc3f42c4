use tracing::debug;

use crate::domain::entities::specification::{Group, Item, Specification};
use crate::error::{Error, Result};
use crate::usecase::ports::driver::RawRow;

/// Builds a `Specification` from the raw grouped rows of a rendered table.
///
/// Data rows accumulate under the most recently seen group header. Cells are
/// trimmed of surrounding whitespace; no other interpretation happens here,
/// numeric parsing and name matching are deferred to the query services.
/// Parsing the same input twice yields structurally equal specifications.
pub fn parse(raw_rows: &[RawRow]) -> Result<Specification> {
    let mut groups: Vec<Group> = Vec::new();
    let mut expected_width: Option<usize> = None;

    for (row_idx, row) in raw_rows.iter().enumerate() {
        match row {
            RawRow::GroupHeader { name } => {
                groups.push(Group::new(name.trim()));
            }
            RawRow::Data { cells } => {
                let group = groups
                    .last_mut()
                    .ok_or(Error::OrphanRow { row_idx })?;

                if cells.is_empty() {
                    return Err(Error::MalformedTable {
                        row_idx,
                        expected: expected_width.unwrap_or(1),
                        found: 0,
                    });
                }
                let width = *expected_width.get_or_insert(cells.len());
                if cells.len() != width {
                    return Err(Error::MalformedTable {
                        row_idx,
                        expected: width,
                        found: cells.len(),
                    });
                }

                let trimmed: Vec<String> =
                    cells.iter().map(|cell| cell.trim().to_string()).collect();
                group.items.push(Item::new(trimmed));
            }
        }
    }

    debug!(
        groups = groups.len(),
        rows = raw_rows.len(),
        "parsed specification table"
    );
    Ok(Specification::new(groups))
}
