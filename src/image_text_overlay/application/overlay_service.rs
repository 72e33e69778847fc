use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;

use super::annotation_normalizer::AnnotationNormalizer;
use super::output_encoder::{EncodedOutput, OutputEncoder};
use crate::config::OverlayConfig;
use crate::domain::error::DomainError;
use crate::domain::http_fetcher_trait::HttpFetcher;
use crate::domain::object_storage_trait::ObjectStorage;
use crate::domain::request::OverlayRequest;
use crate::domain::response::OverlayResponse;
use crate::infrastructure::file_storage::LocalFileStorage;
use crate::infrastructure::font_resolver::FontResolver;
use crate::infrastructure::image_processor::Canvas;

/// Handles one overlay request from payload to response.
///
/// Every failure, including a panic, ends up as a `success: false` response
/// whose `error_message` carries the error chain and a stack backtrace.
pub struct OverlayService {
    fetcher: Arc<dyn HttpFetcher>,
    fonts: FontResolver,
    normalizer: AnnotationNormalizer,
    encoder: OutputEncoder,
}

impl OverlayService {
    pub fn new(
        config: &OverlayConfig,
        fetcher: Arc<dyn HttpFetcher>,
        storage: Option<Arc<dyn ObjectStorage>>,
    ) -> Self {
        Self {
            fonts: FontResolver::new(config.font_dir.clone(), fetcher.clone()),
            normalizer: AnnotationNormalizer::new(config.default_font.clone()),
            encoder: OutputEncoder::new(LocalFileStorage::new(config.work_dir.clone()), storage, config.presign_ttl),
            fetcher,
        }
    }

    /// `None` is returned for an unsupported `return_type`.
    pub fn handle(&self, payload: Value) -> Option<OverlayResponse> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(payload)));

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::error!(error = %format!("{:#}", err), "overlay request failed");
                Some(OverlayResponse::failure(describe_failure(&err)))
            }
            Err(panic) => {
                let err = anyhow::anyhow!("overlay request panicked: {}", panic_message(panic.as_ref()));
                tracing::error!(error = %err, "overlay request failed");
                Some(OverlayResponse::failure(describe_failure(&err)))
            }
        }
    }

    fn process(&self, payload: Value) -> anyhow::Result<Option<OverlayResponse>> {
        let request: OverlayRequest = serde_json::from_value(payload)
            .map_err(|e| DomainError::InvalidInput(format!("malformed request payload: {}", e)))?;
        let return_type = request.return_type();

        let image_data = self
            .fetcher
            .fetch(&request.image_url)
            .with_context(|| format!("failed to fetch image {}", request.image_url))?;
        let mut canvas = Canvas::from_bytes(&image_data).context("failed to decode source image")?;

        tracing::info!("Number of texts: {}", request.texts.len());
        for (index, raw) in request.texts.into_iter().enumerate() {
            tracing::info!(index, annotation = ?raw, "Text Info");
            let overlay = self
                .normalizer
                .normalize(raw, canvas.dimensions())
                .with_context(|| format!("invalid annotation at index {}", index))?;

            tracing::info!(index, font = ?overlay.font, "Font Params");
            let font = self
                .fonts
                .resolve(&overlay.font)
                .with_context(|| format!("font for annotation {} could not be loaded", index))?;

            canvas
                .draw_text(&overlay, &font)
                .with_context(|| format!("failed to draw annotation {}", index))?;
        }

        let output = self
            .encoder
            .encode(&canvas, &return_type, &request.image_url)
            .context("failed to produce output")?;

        Ok(output.map(|output| match output {
            EncodedOutput::Inline(b64) => OverlayResponse::inline(b64),
            EncodedOutput::Link(url) => OverlayResponse::link(url),
        }))
    }
}

// Callers are trusted, so the full diagnostic goes into the response.
fn describe_failure(err: &anyhow::Error) -> String {
    let mut message = format!("{:?}", err);
    if err.backtrace().status() != BacktraceStatus::Captured {
        message.push_str(&format!("\n\nStack backtrace:\n{}", Backtrace::force_capture()));
    }
    message
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
