use super::error::InfrastructureError;
use super::image_processor::Canvas;
use std::path::{Path, PathBuf};

/// Scratch directory where the finished canvas is written before upload.
pub struct LocalFileStorage {
    work_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn save_canvas(&self, canvas: &Canvas, file_name: &str) -> Result<PathBuf, InfrastructureError> {
        let is_plain_name = !file_name.is_empty()
            && Path::new(file_name).file_name().and_then(|n| n.to_str()) == Some(file_name);
        if !is_plain_name {
            return Err(InfrastructureError::FileStorageError(format!(
                "'{}' is not a plain file name",
                file_name
            )));
        }

        std::fs::create_dir_all(&self.work_dir).map_err(InfrastructureError::IoError)?;
        let path = self.work_dir.join(file_name);
        canvas.save(&path)?;
        tracing::debug!(path = %path.display(), "canvas saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn canvas() -> Canvas {
        Canvas::from_image(RgbaImage::from_pixel(8, 6, Rgba([0, 128, 255, 255])))
    }

    #[test]
    fn test_save_canvas_uses_extension_format() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let path = storage.save_canvas(&canvas(), "photo.jpg").unwrap();
        assert_eq!(path, dir.path().join("photo.jpg"));
        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (8, 6));
    }

    #[test]
    fn test_save_canvas_rejects_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        assert!(storage.save_canvas(&canvas(), "../escape.png").is_err());
        assert!(storage.save_canvas(&canvas(), "").is_err());
    }

    #[test]
    fn test_save_canvas_without_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let err = storage.save_canvas(&canvas(), "photo").unwrap_err();
        assert!(matches!(err, InfrastructureError::ImageLibError(_)));
    }
}
