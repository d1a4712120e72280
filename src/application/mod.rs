pub mod add_product;
pub mod attach_image;
pub mod catalog;
pub mod embed;
pub mod reindex;
pub mod search;
pub mod stats;
pub mod upload;
