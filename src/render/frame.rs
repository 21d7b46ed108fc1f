use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{LayerPrimitives, LinePrimitive, RectPrimitive, TextPrimitive};

/// Flat, back-to-front primitive list handed to a `Renderer` for one draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Appends every primitive of `layer`, keeping its internal order.
    pub fn append_layer(&mut self, layer: &LayerPrimitives) {
        self.lines.extend(layer.lines.iter().copied());
        self.rects.extend(layer.rects.iter().copied());
        self.texts.extend(layer.texts.iter().cloned());
    }

    /// Rejects frames a backend could not draw: a zero viewport, or any
    /// primitive with non-finite geometry or out-of-range color channels.
    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        self.lines.iter().try_for_each(|line| line.validate())?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
