use super::error::ApplicationError;
use crate::domain::object_storage_trait::ObjectStorage;
use crate::domain::request::ReturnType;
use crate::infrastructure::error::{InfrastructureError, StorageError};
use crate::infrastructure::file_storage::LocalFileStorage;
use crate::infrastructure::image_processor::Canvas;
use image::ImageFormat;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

pub const EDITED_PREFIX: &str = "edited-";

#[derive(Debug, Clone, PartialEq)]
pub enum EncodedOutput {
    Inline(String),
    // None when the saved canvas vanished before upload
    Link(Option<String>),
}

/// Last path segment of the image URL, e.g. `cat.png` for `https://host/img/cat.png?v=2`.
pub fn source_image_name(image_url: &str) -> Result<String, ApplicationError> {
    let invalid = |reason: String| ApplicationError::InvalidImageUrl {
        url: image_url.to_string(),
        reason,
    };

    let url = Url::parse(image_url).map_err(|e| invalid(e.to_string()))?;
    // data: URLs have no path segments
    let segment = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| invalid("URL has no file name in its path".to_string()))?;

    Ok(segment.to_string())
}

pub struct OutputEncoder {
    files: LocalFileStorage,
    storage: Option<Arc<dyn ObjectStorage>>,
    presign_ttl: Duration,
}

impl OutputEncoder {
    pub fn new(files: LocalFileStorage, storage: Option<Arc<dyn ObjectStorage>>, presign_ttl: Duration) -> Self {
        Self {
            files,
            storage,
            presign_ttl,
        }
    }

    /// `Ok(None)` means the return type is not one we produce output for.
    pub fn encode(
        &self,
        canvas: &Canvas,
        mode: &ReturnType,
        image_url: &str,
    ) -> Result<Option<EncodedOutput>, ApplicationError> {
        match mode {
            ReturnType::Base64 => {
                let jpeg = canvas.encode(ImageFormat::Jpeg)?;
                Ok(Some(EncodedOutput::Inline(base64::encode(jpeg))))
            }
            ReturnType::S3 => self.upload(canvas, &source_image_name(image_url)?).map(Some),
            ReturnType::Unsupported(other) => {
                tracing::warn!(return_type = %other, "unsupported return_type, no output produced");
                Ok(None)
            }
        }
    }

    fn upload(&self, canvas: &Canvas, source_image_name: &str) -> Result<EncodedOutput, ApplicationError> {
        let storage = self.storage.as_ref().ok_or_else(|| {
            ApplicationError::ConfigurationError("return_type 's3' requires BUCKET_NAME to be set".to_string())
        })?;

        let key = format!("{}{}", EDITED_PREFIX, source_image_name);
        let local_path = self.files.save_canvas(canvas, source_image_name)?;

        match storage.upload(&local_path, &key) {
            Ok(()) => {}
            // The only failure recovered here: the caller still gets success, with no URL.
            Err(StorageError::FileNotFound(path)) => {
                tracing::warn!(path = %path.display(), "The file was not found, returning no URL");
                return Ok(EncodedOutput::Link(None));
            }
            Err(e) => return Err(InfrastructureError::from(e).into()),
        }

        if let Err(e) = std::fs::remove_file(&local_path) {
            tracing::debug!(path = %local_path.display(), error = %e, "could not remove local copy");
        }

        let url = storage
            .presign_get(&key, self.presign_ttl)
            .map_err(InfrastructureError::from)?;
        tracing::info!(key = %key, "edited image uploaded");
        Ok(EncodedOutput::Link(Some(url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::object_storage_trait::MockObjectStorage;
    use image::{Rgba, RgbaImage};
    use mockall::predicate::{always, eq};

    const IMAGE_URL: &str = "https://cdn.example.com/img/cat.png";

    fn canvas() -> Canvas {
        Canvas::from_image(RgbaImage::from_pixel(40, 30, Rgba([10, 200, 30, 255])))
    }

    fn encoder(dir: &tempfile::TempDir, storage: Option<MockObjectStorage>) -> OutputEncoder {
        OutputEncoder::new(
            LocalFileStorage::new(dir.path()),
            storage.map(|s| Arc::new(s) as Arc<dyn ObjectStorage>),
            Duration::from_secs(24 * 3600),
        )
    }

    #[test]
    fn test_source_image_name() {
        assert_eq!(source_image_name("https://cdn.example.com/img/cat.png").unwrap(), "cat.png");
        assert_eq!(source_image_name("https://cdn.example.com/img/cat.png?v=2#top").unwrap(), "cat.png");
    }

    #[test]
    fn test_source_image_name_rejects_urls_without_a_file_name() {
        for url in [
            "data:image/png;base64,AAAA/BBB.png",
            "https://cdn.example.com/img/",
            "cat.jpg",
        ] {
            match source_image_name(url) {
                Err(ApplicationError::InvalidImageUrl { url: reported, .. }) => assert_eq!(reported, url),
                other => panic!("Expected InvalidImageUrl for {}, got {:?}", url, other),
            }
        }
    }

    #[test]
    fn test_s3_with_data_url_fails_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage.expect_upload().never();

        let err = encoder(&dir, Some(storage))
            .encode(&canvas(), &ReturnType::S3, "data:image/png;base64,AAAA/BBB.png")
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidImageUrl { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_base64_round_trip_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let output = encoder(&dir, None).encode(&canvas(), &ReturnType::Base64, IMAGE_URL).unwrap();

        let encoded = match output {
            Some(EncodedOutput::Inline(encoded)) => encoded,
            other => panic!("Expected inline output, got {:?}", other),
        };
        let decoded = image::load_from_memory(&base64::decode(encoded).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_s3_uploads_under_prefixed_key_and_presigns_for_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let saved_path = dir.path().join("cat.png");

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(move |path, key| path == saved_path.as_path() && key == "edited-cat.png")
            .times(1)
            .returning(|path, _| {
                assert!(path.exists());
                Ok(())
            });
        storage
            .expect_presign_get()
            .with(eq("edited-cat.png"), eq(Duration::from_secs(86400)))
            .times(1)
            .returning(|_, _| Ok("https://bucket.s3.amazonaws.com/edited-cat.png?sig".to_string()));

        let output = encoder(&dir, Some(storage)).encode(&canvas(), &ReturnType::S3, IMAGE_URL).unwrap();
        assert_eq!(
            output,
            Some(EncodedOutput::Link(Some("https://bucket.s3.amazonaws.com/edited-cat.png?sig".to_string())))
        );
    }

    #[test]
    fn test_s3_missing_local_file_yields_no_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .returning(|path, _| Err(StorageError::FileNotFound(path.to_path_buf())));
        storage.expect_presign_get().never();

        let output = encoder(&dir, Some(storage)).encode(&canvas(), &ReturnType::S3, IMAGE_URL).unwrap();
        assert_eq!(output, Some(EncodedOutput::Link(None)));
    }

    #[test]
    fn test_s3_other_upload_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = MockObjectStorage::new();
        storage.expect_upload().with(always(), always()).returning(|_, key| {
            Err(StorageError::Upload {
                key: key.to_string(),
                reason: "AccessDenied".to_string(),
            })
        });

        let err = encoder(&dir, Some(storage))
            .encode(&canvas(), &ReturnType::S3, IMAGE_URL)
            .unwrap_err();
        assert!(err.to_string().contains("AccessDenied"));
    }

    #[test]
    fn test_s3_without_storage_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = encoder(&dir, None).encode(&canvas(), &ReturnType::S3, IMAGE_URL).unwrap_err();
        assert!(matches!(err, ApplicationError::ConfigurationError(_)));
    }

    #[test]
    fn test_unsupported_mode_produces_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = encoder(&dir, None)
            .encode(&canvas(), &ReturnType::Unsupported("ftp".into()), IMAGE_URL)
            .unwrap();
        assert_eq!(output, None);
    }
}
