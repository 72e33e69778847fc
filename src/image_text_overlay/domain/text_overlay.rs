use crate::domain::color::Color;
use crate::domain::draw_options::DrawOptions;
use crate::domain::font_spec::FontSpec;
use crate::domain::position::Position;

/// One fully-defaulted text annotation, ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct TextOverlay {
    pub text: String,
    pub font: FontSpec,
    pub fill: Color,
    pub position: Position,
    pub options: DrawOptions,
}

impl TextOverlay {
    pub fn new(text: String, font: FontSpec, fill: Color, position: Position) -> Self {
        Self {
            text,
            font,
            fill,
            position,
            options: DrawOptions::new(),
        }
    }

    pub fn with_options(mut self, options: DrawOptions) -> Self {
        self.options = options;
        self
    }
}
