use thiserror::Error;

use crate::domain::entities::specification::{ComponentType, Item};

/// One raw row as scraped from the rendered table, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// A section header carrying the group name.
    GroupHeader { name: String },
    /// A data row carrying the ordered cell strings.
    Data { cells: Vec<String> },
}

impl RawRow {
    pub fn header(name: impl Into<String>) -> Self {
        RawRow::GroupHeader { name: name.into() }
    }

    pub fn data(cells: Vec<&str>) -> Self {
        RawRow::Data {
            cells: cells.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Failures reported by the UI-driving collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// The surface has not rendered candidate rows yet. Retryable, bounded
    /// by the caller-supplied attempt count; the core never waits forever.
    #[error("candidates not yet available")]
    CandidatesUnavailable,

    /// The surface rejected the requested action.
    #[error("driver rejected action: {0}")]
    Rejected(String),
}

/// Supplies the raw grouped rows of a rendered table.
pub trait RowSource: Send + Sync {
    fn read_rows(&self, table_id: &str) -> Result<Vec<RawRow>, DriverError>;
}

/// Realizes edit-workflow transitions against the live surface.
///
/// Save and reload live here as well: the workflow drives them against the
/// same surface that hosts the dialog.
pub trait DialogDriver: Send + Sync {
    fn open(&self, category: ComponentType) -> Result<(), DriverError>;
    fn search(&self, term: &str) -> Result<Vec<Item>, DriverError>;
    fn select(&self, candidate: &Item) -> Result<(), DriverError>;
    fn confirm_stage(&self) -> Result<(), DriverError>;
    fn confirm_main(&self) -> Result<(), DriverError>;
    fn close(&self) -> Result<(), DriverError>;
    fn remove(&self, category: ComponentType, item_name: &str) -> Result<(), DriverError>;
    fn save(&self) -> Result<(), DriverError>;
    fn reload(&self) -> Result<(), DriverError>;
}
