use super::error::{InfrastructureError, LocalFontError};
use crate::domain::font_spec::FontSpec;
use crate::domain::http_fetcher_trait::HttpFetcher;
use rusttype::{Font, Scale};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_FONT_EXTENSION: &str = "ttf";

#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Local(PathBuf),
    Remote(String),
}

/// A font ready to draw with, sized according to its `FontSpec`.
pub struct LoadedFont {
    pub font: Font<'static>,
    pub scale: Scale,
    pub source: FontSource,
}

/// Looks fonts up in the local bundle first and falls back to downloading
/// the identifier as a URL.
pub struct FontResolver {
    font_dir: PathBuf,
    fetcher: Arc<dyn HttpFetcher>,
}

impl FontResolver {
    pub fn new(font_dir: impl Into<PathBuf>, fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self {
            font_dir: font_dir.into(),
            fetcher,
        }
    }

    // "arial" -> <font_dir>/arial.ttf, "mono.otf" -> <font_dir>/mono.otf
    pub fn local_path(&self, font: &str) -> PathBuf {
        let candidate = Path::new(font);
        if candidate.extension().is_some() {
            self.font_dir.join(candidate)
        } else {
            self.font_dir.join(format!("{}.{}", font, DEFAULT_FONT_EXTENSION))
        }
    }

    pub fn resolve(&self, spec: &FontSpec) -> Result<LoadedFont, InfrastructureError> {
        let local = match self.load_local(spec) {
            Ok((font, path)) => {
                tracing::info!(font = %spec.font, path = %path.display(), "font loaded from local bundle");
                let scale = em_scale(&font, spec.size);
                return Ok(LoadedFont { font, scale, source: FontSource::Local(path) });
            }
            Err(e) => e,
        };
        tracing::debug!(font = %spec.font, reason = %local, "local font lookup failed, trying remote");

        match self.load_remote(spec) {
            Ok(font) => {
                tracing::info!(font = %spec.font, "font downloaded");
                let scale = em_scale(&font, spec.size);
                Ok(LoadedFont {
                    font,
                    scale,
                    source: FontSource::Remote(spec.font.clone()),
                })
            }
            Err(remote) => Err(InfrastructureError::FontResolutionError {
                font: spec.font.clone(),
                local,
                // keep the cause chain, e.g. the reqwest error behind "Reqwest error"
                remote: format!("{:#}", anyhow::Error::from(remote)),
            }),
        }
    }

    fn load_local(&self, spec: &FontSpec) -> Result<(Font<'static>, PathBuf), LocalFontError> {
        let path = self.local_path(&spec.font);

        // Identifiers may only address files inside the bundle.
        let escapes_bundle = Path::new(&spec.font)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes_bundle {
            return Err(LocalFontError::NotFound(path));
        }

        let data = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LocalFontError::NotFound(path.clone())
            } else {
                LocalFontError::Unreadable { path: path.clone(), source }
            }
        })?;

        match Font::try_from_vec_and_index(data, spec.index) {
            Some(font) => Ok((font, path)),
            None => Err(LocalFontError::Malformed(path)),
        }
    }

    fn load_remote(&self, spec: &FontSpec) -> Result<Font<'static>, InfrastructureError> {
        let data = self.fetcher.fetch(&spec.font)?;
        Font::try_from_vec_and_index(data, spec.index).ok_or_else(|| {
            InfrastructureError::DecodingError(format!("downloaded data from {} is not a usable font", spec.font))
        })
    }
}

/// `size` is the em size in pixels. rusttype scales by ascent minus descent,
/// so convert using the font's own metrics.
pub fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let units_per_em = font.units_per_em();
    let v_metrics = font.v_metrics_unscaled();
    let height = v_metrics.ascent - v_metrics.descent;
    if units_per_em == 0 || height <= 0.0 {
        return Scale::uniform(size);
    }
    Scale::uniform(size * height / units_per_em as f32)
}
