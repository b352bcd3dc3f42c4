//! Structural model and staged edit workflow for a BOM specification table.
//!
//! The crate turns the grouped rows of a rendered specification table into a
//! [`Specification`] tree, offers pure queries over it (quantity lookup,
//! membership, order-aware snapshot comparison) and drives a staged
//! add-then-commit-then-save editing workflow through [`EditSession`]. The
//! UI-driving layer stays behind the [`RowSource`] and [`DialogDriver`]
//! collaborator traits.

pub mod domain;
pub mod error;
pub mod infra;
pub mod usecase;

pub use domain::entities::specification::{
    ColumnLayout, ComponentType, Group, Item, Specification,
};
pub use domain::entities::staging::StagingSet;
pub use error::{Error, Result};
pub use usecase::ports::driver::{DialogDriver, DriverError, RawRow, RowSource};
pub use usecase::services::edit_service::{EditSession, SessionConfig};
pub use usecase::services::parser::parse;
pub use usecase::services::query_service::{contains_value, quantity_of};
pub use usecase::services::snapshot::{equal, first_difference};
