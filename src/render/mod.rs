mod bar_shape;
mod frame;
mod layered_frame;
mod null_renderer;
mod primitives;

pub use bar_shape::{BarShape, DECREASE_COLOR, INCREASE_COLOR, TOTAL_COLOR, WaterfallBarShape};
pub use frame::RenderFrame;
pub use layered_frame::{CanvasLayerKind, LayerPrimitives, LayeredRenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart domain and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
