pub mod image_format;
pub mod price;
pub mod product_id;
