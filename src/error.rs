use thiserror::Error;

use crate::domain::entities::specification::ComponentType;
use crate::usecase::ports::driver::DriverError;

/// Failures of the table core.
///
/// Every variant carries enough context (group name, item name, row index) to
/// diagnose without re-running the scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// A data row's width does not match the table's column count.
    #[error("malformed table: row {row_idx} has {found} cells, expected {expected}")]
    MalformedTable {
        row_idx: usize,
        expected: usize,
        found: usize,
    },

    /// A data row appeared before any group header.
    #[error("orphan data row at index {row_idx}: no preceding group header")]
    OrphanRow { row_idx: usize },

    /// Lookup or removal target is absent. `group` names the searched scope:
    /// a group name, or "any group" for a specification-wide lookup.
    #[error("item '{item}' not found in {group}")]
    ItemNotFound { group: String, item: String },

    /// The quantity cell is not a base-10 integer.
    #[error("quantity of '{item}' in group '{group}' is not numeric: '{raw}'")]
    QuantityParse {
        group: String,
        item: String,
        raw: String,
    },

    /// Only one staging set may be open at a time; the blocked operation is
    /// named for diagnosis.
    #[error("add dialog for {open} already open, cannot {operation}")]
    DialogAlreadyOpen {
        open: ComponentType,
        operation: String,
    },

    /// A dialog operation was invoked with no dialog open.
    #[error("no add dialog open for operation '{operation}'")]
    DialogNotOpen { operation: &'static str },

    /// Stage confirmation with nothing staged, or a staged row with no
    /// content.
    #[error("nothing staged to confirm")]
    NothingStaged,

    /// The external collaborator refused or could not complete an action.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
