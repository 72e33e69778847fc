pub mod color;
pub mod draw_options;
pub mod error;
pub mod font_spec;
pub mod http_fetcher_trait;
pub mod object_storage_trait;
pub mod position;
pub mod request;
pub mod response;
pub mod text_overlay;
