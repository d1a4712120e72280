pub mod embedding_port;
pub mod image_store;
pub mod product_repository;
pub mod similarity_search;
