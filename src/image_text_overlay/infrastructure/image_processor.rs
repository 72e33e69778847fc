use super::error::InfrastructureError;
use super::font_resolver::LoadedFont;
use crate::domain::color::Color;
use crate::domain::draw_options::{DrawOptions, OptionValue};
use crate::domain::text_overlay::TextOverlay;
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Pixel, Rgba, RgbaImage};
use imageproc::distance_transform::euclidean_squared_distance_transform;
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use std::io::Cursor;
use std::path::Path;

const DEFAULT_LINE_SPACING: f32 = 4.0;
pub const MAX_STROKE_WIDTH: u32 = 255;

#[derive(Debug, Clone, Copy, PartialEq)]
enum HorizontalAnchor {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum VerticalAnchor {
    Top,
    Ascender,
    Middle,
    Baseline,
    Descender,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
    Right,
}

// Draw options this backend understands. Anything else is accepted and ignored.
struct TextStyle {
    horizontal: HorizontalAnchor,
    vertical: VerticalAnchor,
    spacing: f32,
    align: Align,
    stroke_width: u32,
    stroke_fill: Color,
}

impl TextStyle {
    fn from_options(options: &DrawOptions, fill: Color) -> Result<Self, InfrastructureError> {
        let invalid = |key: &str, value: &OptionValue| {
            InfrastructureError::ImageProcessingError(format!("invalid value for draw option '{}': {:?}", key, value))
        };

        let mut style = TextStyle {
            horizontal: HorizontalAnchor::Left,
            vertical: VerticalAnchor::Ascender,
            spacing: DEFAULT_LINE_SPACING,
            align: Align::Left,
            stroke_width: 0,
            stroke_fill: fill,
        };

        for key in options.keys() {
            let value = match options.get(key) {
                Some(value) => value,
                None => continue,
            };
            match key {
                "anchor" => {
                    let anchor = value.as_str().ok_or_else(|| invalid(key, value))?;
                    let mut chars = anchor.chars();
                    style.horizontal = match chars.next() {
                        Some('l') => HorizontalAnchor::Left,
                        Some('m') => HorizontalAnchor::Middle,
                        Some('r') => HorizontalAnchor::Right,
                        _ => return Err(invalid(key, value)),
                    };
                    style.vertical = match (chars.next(), chars.next()) {
                        (Some('t'), None) => VerticalAnchor::Top,
                        (Some('a'), None) => VerticalAnchor::Ascender,
                        (Some('m'), None) => VerticalAnchor::Middle,
                        (Some('s'), None) => VerticalAnchor::Baseline,
                        (Some('d'), None) => VerticalAnchor::Descender,
                        (Some('b'), None) => VerticalAnchor::Bottom,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "spacing" => {
                    style.spacing = value.as_f64().ok_or_else(|| invalid(key, value))? as f32;
                }
                "align" => {
                    style.align = match value.as_str() {
                        Some("left") => Align::Left,
                        Some("center") => Align::Center,
                        Some("right") => Align::Right,
                        _ => return Err(invalid(key, value)),
                    };
                }
                "stroke_width" => {
                    style.stroke_width = value
                        .as_f64()
                        .map(f64::round)
                        .filter(|w| (0.0..=MAX_STROKE_WIDTH as f64).contains(w))
                        .ok_or_else(|| invalid(key, value))? as u32;
                }
                "stroke_fill" => {
                    style.stroke_fill = value.as_color().ok_or_else(|| invalid(key, value))?;
                }
                other => tracing::debug!(option = %other, "draw option not supported by backend, ignoring"),
            }
        }
        Ok(style)
    }
}

/// The single mutable image surface text gets drawn onto.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn from_bytes(image_bytes: &[u8]) -> Result<Canvas, InfrastructureError> {
        let reader = image::io::Reader::new(Cursor::new(image_bytes))
            .with_guessed_format()
            .map_err(InfrastructureError::IoError)?;
        let image = reader.decode().map_err(InfrastructureError::ImageLibError)?.to_rgba8();
        Ok(Canvas { image })
    }

    pub fn from_image(image: RgbaImage) -> Canvas {
        Canvas { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Draws `overlay` in place. Earlier draws are never undone, even if this one fails.
    pub fn draw_text(&mut self, overlay: &TextOverlay, font: &LoadedFont) -> Result<(), InfrastructureError> {
        let style = TextStyle::from_options(&overlay.options, overlay.fill)?;
        let v_metrics = font.font.v_metrics(font.scale);
        let line_height = v_metrics.ascent - v_metrics.descent;

        let lines: Vec<&str> = overlay.text.split('\n').collect();
        let widths: Vec<f32> = lines.iter().map(|line| line_width(&font.font, font.scale, line)).collect();
        let block_width = widths.iter().cloned().fold(0.0, f32::max);
        let block_height = line_height * lines.len() as f32 + style.spacing * (lines.len() as f32 - 1.0);

        let x = overlay.position.x as f32;
        let y = overlay.position.y as f32;
        let left = match style.horizontal {
            HorizontalAnchor::Left => x,
            HorizontalAnchor::Middle => x - block_width / 2.0,
            HorizontalAnchor::Right => x - block_width,
        };
        let top = match style.vertical {
            VerticalAnchor::Top => {
                let (ink_top, _) = ink_extent(&font.font, font.scale, lines[0]).unwrap_or((0.0, line_height));
                y - ink_top
            }
            VerticalAnchor::Ascender => y,
            VerticalAnchor::Middle => y - block_height / 2.0,
            VerticalAnchor::Baseline => y - v_metrics.ascent,
            VerticalAnchor::Descender => y - block_height,
            VerticalAnchor::Bottom => {
                let last = lines[lines.len() - 1];
                let (_, ink_bottom) = ink_extent(&font.font, font.scale, last).unwrap_or((0.0, line_height));
                y - (block_height - line_height) - ink_bottom
            }
        };

        let fill = Rgba(overlay.fill.to_rgba());
        let stroke = Rgba(style.stroke_fill.to_rgba());
        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let line_left = match style.align {
                Align::Left => left,
                Align::Center => left + (block_width - width) / 2.0,
                Align::Right => left + block_width - width,
            };
            let line_x = line_left.round() as i32;
            let line_y = (top + i as f32 * (line_height + style.spacing)).round() as i32;

            if style.stroke_width > 0 {
                self.draw_stroke(line, (line_x, line_y), font, style.stroke_width, stroke);
            }
            draw_text_mut(&mut self.image, fill, line_x, line_y, font.scale, &font.font, line);
        }
        Ok(())
    }

    // Renders the line once into a mask and paints every pixel within
    // `stroke_width` (Euclidean distance) of its ink.
    fn draw_stroke(&mut self, line: &str, origin: (i32, i32), font: &LoadedFont, stroke_width: u32, stroke: Rgba<u8>) {
        let (line_x, line_y) = origin;
        // glyphs may overhang the advance box a little
        let pad = stroke_width + font.scale.y.ceil() as u32 / 2;
        let v_metrics = font.font.v_metrics(font.scale);
        let mask_width = line_width(&font.font, font.scale, line).ceil() as u32 + 2 * pad;
        let mask_height = (v_metrics.ascent - v_metrics.descent).ceil() as u32 + 2 * pad;

        let mut mask = GrayImage::new(mask_width, mask_height);
        draw_text_mut(&mut mask, Luma([255]), pad as i32, pad as i32, font.scale, &font.font, line);
        let distances = euclidean_squared_distance_transform(&mask);

        let reach = (stroke_width as f64).powi(2);
        let (canvas_width, canvas_height) = self.image.dimensions();
        for (mx, my, distance) in distances.enumerate_pixels() {
            if distance[0] > reach {
                continue;
            }
            let x = line_x as i64 - pad as i64 + mx as i64;
            let y = line_y as i64 - pad as i64 + my as i64;
            if x < 0 || y < 0 || x >= canvas_width as i64 || y >= canvas_height as i64 {
                continue;
            }
            self.image.get_pixel_mut(x as u32, y as u32).blend(&stroke);
        }
    }

    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>, InfrastructureError> {
        let mut buffer = Cursor::new(Vec::new());
        self.to_dynamic_for(format)
            .write_to(&mut buffer, format)
            .map_err(InfrastructureError::ImageLibError)?;
        Ok(buffer.into_inner())
    }

    /// Saves in the format implied by the file extension.
    pub fn save(&self, path: &Path) -> Result<(), InfrastructureError> {
        let format = ImageFormat::from_path(path).map_err(InfrastructureError::ImageLibError)?;
        self.to_dynamic_for(format)
            .save_with_format(path, format)
            .map_err(InfrastructureError::ImageLibError)
    }

    // JPEG has no alpha channel.
    fn to_dynamic_for(&self, format: ImageFormat) -> DynamicImage {
        let image = DynamicImage::ImageRgba8(self.image.clone());
        if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(image.to_rgb8())
        } else {
            image
        }
    }
}

fn line_width(font: &Font<'_>, scale: Scale, line: &str) -> f32 {
    font.layout(line, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

// Vertical span of the inked pixels, measured from the line's top (ascender).
fn ink_extent(font: &Font<'_>, scale: Scale, line: &str) -> Option<(f32, f32)> {
    let ascent = font.v_metrics(scale).ascent;
    font.layout(line, scale, point(0.0, ascent))
        .filter_map(|g| g.pixel_bounding_box())
        .fold(None, |extent, bb| {
            let (top, bottom) = (bb.min.y as f32, bb.max.y as f32);
            Some(match extent {
                None => (top, bottom),
                Some((t, b)) => (f32::min(t, top), f32::max(b, bottom)),
            })
        })
}
