pub mod annotations;
pub mod controller;
pub mod series;
pub mod visibility;

pub use annotations::{AnnotationEntry, AnnotationIndex, AnnotationKey};
pub use controller::{ActiveAnnotation, PlotController};
pub use series::{build_series, display_text, Point, Series};
pub use visibility::VisibilityController;

/// Something that can draw series and a single annotation, and redraw on request.
pub trait PlotSurface {
    /// Replace everything drawn with these series, all shown.
    fn draw_series(&mut self, series: &[Series]);

    fn set_series_visible(&mut self, identity: &str, visible: bool);

    /// Show `text` anchored at a point. Replaces any annotation already shown.
    fn annotate(&mut self, at: Point, text: &str);

    fn clear_annotation(&mut self);

    fn request_redraw(&mut self);
}
