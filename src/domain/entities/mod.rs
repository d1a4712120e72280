pub mod catalog_entry;
pub mod product;
