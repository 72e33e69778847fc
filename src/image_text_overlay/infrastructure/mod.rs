pub mod axum_handler;
pub mod error;
pub mod external_image_fetcher;
pub mod file_storage;
pub mod font_resolver;
pub mod image_processor;
pub mod s3_storage;
