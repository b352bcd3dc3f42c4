pub mod specification;
pub mod staging;
