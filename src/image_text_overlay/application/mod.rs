pub mod annotation_normalizer;
pub mod error;
pub mod output_encoder;
pub mod overlay_service;
