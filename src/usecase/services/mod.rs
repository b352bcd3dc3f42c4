pub mod edit_service;
pub mod parser;
pub mod query_service;
pub mod snapshot;
