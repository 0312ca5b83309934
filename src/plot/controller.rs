use super::annotations::{AnnotationEntry, AnnotationIndex};
use super::series::{build_series, Point, Series};
use super::visibility::VisibilityController;
use super::PlotSurface;
use crate::feeds::Record;

/// The annotation currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAnnotation {
    pub identity: String,
    pub entry: AnnotationEntry,
}

/// Owns the built series, their annotation index, the visibility flags and
/// the one annotation on screen, and reacts to pick and legend clicks.
pub struct PlotController {
    series: Vec<Series>,
    index: AnnotationIndex,
    visibility: VisibilityController,
    active: Option<ActiveAnnotation>,
}

impl PlotController {
    pub fn new(histories: &[(String, Vec<Record>)]) -> Self {
        let (series, index) = build_series(histories);
        let visibility = VisibilityController::new(&series);

        Self {
            series,
            index,
            visibility,
            active: None,
        }
    }

    /// Rebuild from fresh records. Visibility and the annotation start over.
    pub fn rebuild(&mut self, histories: &[(String, Vec<Record>)], surface: &mut dyn PlotSurface) {
        *self = Self::new(histories);
        surface.clear_annotation();
        self.attach(surface);
    }

    /// Draw every series on the surface.
    pub fn attach(&self, surface: &mut dyn PlotSurface) {
        surface.draw_series(&self.series);
        surface.request_redraw();
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    pub fn is_visible(&self, identity: &str) -> bool {
        self.visibility.is_visible(identity)
    }

    pub fn active_annotation(&self) -> Option<&ActiveAnnotation> {
        self.active.as_ref()
    }

    /// Handle a click on point `point_index` of a series.
    ///
    /// The previous annotation is always removed. A new one is drawn when the
    /// point exists, its series is shown and the index knows its coordinates.
    pub fn on_pick(
        &mut self,
        identity: &str,
        point_index: usize,
        surface: &mut dyn PlotSurface,
    ) -> Option<&ActiveAnnotation> {
        self.clear_annotation(surface);

        let point = self.visible_point(identity, point_index)?;
        let entry = self.index.lookup(identity, point.x, point.y)?.clone();

        surface.annotate(
            Point {
                x: entry.x,
                y: entry.y,
            },
            &entry.display_text,
        );
        surface.request_redraw();

        self.active = Some(ActiveAnnotation {
            identity: identity.to_string(),
            entry,
        });
        self.active.as_ref()
    }

    fn visible_point(&self, identity: &str, point_index: usize) -> Option<Point> {
        if !self.visibility.is_visible(identity) {
            return None;
        }
        let series = self.series.iter().find(|s| s.identity == identity)?;
        series.points.get(point_index).copied()
    }

    /// Handle a click on a legend entry. Returns false for an unknown identity.
    pub fn on_legend_click(&mut self, identity: &str, surface: &mut dyn PlotSurface) -> bool {
        let Some(visible) = self.visibility.toggle(identity) else {
            return false;
        };

        surface.set_series_visible(identity, visible);
        surface.request_redraw();
        true
    }

    /// Remove the annotation on screen, if there is one.
    pub fn clear_annotation(&mut self, surface: &mut dyn PlotSurface) {
        if self.active.take().is_some() {
            surface.clear_annotation();
            surface.request_redraw();
        }
    }
}
