//! Draws caller-specified text annotations onto a downloaded image and returns
//! the result inline (base64 JPEG) or as a presigned S3 link.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
