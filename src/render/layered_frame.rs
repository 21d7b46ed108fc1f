use serde::{Deserialize, Serialize};

use crate::core::Viewport;

use super::{LinePrimitive, RectPrimitive, RenderFrame, TextPrimitive};

/// Draw layers of a waterfall chart, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Bars,
    Labels,
    Axis,
    Legend,
    Overlay,
}

impl CanvasLayerKind {
    pub const CANONICAL: [Self; 7] = [
        Self::Background,
        Self::Grid,
        Self::Bars,
        Self::Labels,
        Self::Axis,
        Self::Legend,
        Self::Overlay,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn empty(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }
}

/// Render frame grouped by layer so hosts and tests can address chart parts
/// (bars, labels, legend...) without inspecting geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredRenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<LayerPrimitives>,
}

impl LayeredRenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: CanvasLayerKind::CANONICAL
                .into_iter()
                .map(LayerPrimitives::empty)
                .collect(),
        }
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.lines.push(line);
        }
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.rects.push(rect);
        }
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.texts.push(text);
        }
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            frame.append_layer(layer);
        }
        frame
    }

    #[must_use]
    pub fn flatten_layers(&self, include_layers: &[CanvasLayerKind]) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &self.layers {
            if include_layers.contains(&layer.kind) {
                frame.append_layer(layer);
            }
        }
        frame
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|layer| layer.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayerKind, LayeredRenderFrame};
    use crate::core::Viewport;
    use crate::render::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn layered_render_frame_flattens_in_canonical_order() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));

        layered.push_line(
            CanvasLayerKind::Axis,
            LinePrimitive::new(0.0, 2.0, 5.0, 2.0, 1.0, Color::rgb(0.8, 0.2, 0.2)),
        );
        layered.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(0.0, 1.0, 5.0, 1.0, 1.0, Color::rgb(0.2, 0.2, 0.2)),
        );
        layered.push_text(
            CanvasLayerKind::Labels,
            TextPrimitive::new("x", 2.0, 4.0, 10.0, Color::rgb(0.0, 0.0, 0.0), TextHAlign::Right),
        );

        let flattened = layered.flatten();
        assert_eq!(flattened.lines.len(), 2);
        assert_eq!(flattened.texts.len(), 1);
        // Grid is drawn before the axis regardless of push order.
        assert_eq!(flattened.lines[0].y1, 1.0);
        assert_eq!(flattened.lines[1].y1, 2.0);
    }

    #[test]
    fn flatten_layers_filters_by_kind() {
        let mut layered = LayeredRenderFrame::new(Viewport::new(100, 50));
        layered.push_rect(
            CanvasLayerKind::Bars,
            RectPrimitive::new(0.0, 0.0, 10.0, 10.0, Color::rgb(0.5, 0.5, 0.5)),
        );
        layered.push_rect(
            CanvasLayerKind::Legend,
            RectPrimitive::new(20.0, 0.0, 5.0, 5.0, Color::rgb(0.5, 0.5, 0.5)),
        );

        let bars_only = layered.flatten_layers(&[CanvasLayerKind::Bars]);
        assert_eq!(bars_only.primitive_count(), 1);
        assert_eq!(bars_only.rects[0].x, 0.0);
        assert!(
            layered
                .layer(CanvasLayerKind::Overlay)
                .expect("overlay layer")
                .is_empty()
        );
    }
}
