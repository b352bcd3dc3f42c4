pub mod import;
pub mod page;
