use crate::plot::{PlotSurface, Point, Series};
use chrono::DateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, List, ListItem, Paragraph},
    Frame,
};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::LightBlue,
    Color::LightRed,
];

/// How far from a point (in cells) a click still picks it.
const PICK_RADIUS: f64 = 2.0;

const ANNOTATION_WIDTH: usize = 40;

const HELP_TEXT: &str =
    "click a point to read it | click legend or 1-9 to toggle | Tab/←/→ step | Esc clear | q quit";

#[derive(Debug, Clone)]
struct SeriesView {
    identity: String,
    coords: Vec<(f64, f64)>,
    style: usize,
    visible: bool,
}

/// Data-space extent of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
        }
    }
}

impl Bounds {
    /// Cover every point of every series, hidden ones included, so toggling
    /// does not rescale the axes. Retweets always start from zero, with
    /// about ten percent headroom on top.
    fn fit(series: &[SeriesView]) -> Self {
        let mut points = series.iter().flat_map(|s| s.coords.iter());
        let Some(&(first_x, first_y)) = points.next() else {
            return Self::default();
        };

        let (mut x0, mut x1, mut y1) = (first_x, first_x, first_y);
        for &(x, y) in points {
            x0 = x0.min(x);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }

        // Half a day either side of a lone timestamp
        if x1 - x0 < 1.0 {
            x0 -= 43_200.0;
            x1 += 43_200.0;
        }

        Self {
            x: [x0, x1],
            y: [0.0, y1 + (y1 * 0.1).ceil().max(1.0)],
        }
    }

    /// Fractional cell position of a data point inside `graph`.
    fn to_cell(&self, graph: Rect, x: f64, y: f64) -> (f64, f64) {
        let width = graph.width.saturating_sub(1) as f64;
        let height = graph.height.saturating_sub(1) as f64;
        let fx = (x - self.x[0]) / (self.x[1] - self.x[0]);
        let fy = (y - self.y[0]) / (self.y[1] - self.y[0]);

        (
            graph.x as f64 + fx * width,
            graph.y as f64 + (1.0 - fy) * height,
        )
    }
}

/// What a mouse click landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    Point {
        series: usize,
        identity: String,
        index: usize,
    },
    Legend {
        series: usize,
        identity: String,
    },
}

/// Retweets-over-time chart with a clickable legend and one annotation popup.
pub struct ChartWidget {
    title: String,
    series: Vec<SeriesView>,
    bounds: Bounds,
    annotation: Option<(Point, Vec<String>)>,
    highlight: Option<(usize, usize)>,
    status: Option<String>,
    needs_redraw: bool,
    graph_area: Rect,
    legend_area: Rect,
}

impl ChartWidget {
    pub fn new(title: String) -> Self {
        Self {
            title,
            series: Vec::new(),
            bounds: Bounds::default(),
            annotation: None,
            highlight: None,
            status: None,
            needs_redraw: true,
            graph_area: Rect::default(),
            legend_area: Rect::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
        self.needs_redraw = true;
    }

    /// Mark point `index` of series `series` with a block marker.
    pub fn set_highlight(&mut self, highlight: Option<(usize, usize)>) {
        self.highlight = highlight;
        self.needs_redraw = true;
    }

    pub fn annotation_lines(&self) -> Option<&[String]> {
        self.annotation.as_ref().map(|(_, lines)| lines.as_slice())
    }

    pub fn is_series_visible(&self, identity: &str) -> bool {
        self.series.iter().any(|s| s.identity == identity && s.visible)
    }

    /// Screen cell of a series point as of the last render.
    pub fn point_cell(&self, series: usize, index: usize) -> Option<(u16, u16)> {
        let &(x, y) = self.series.get(series)?.coords.get(index)?;
        let (cx, cy) = self.bounds.to_cell(self.graph_area, x, y);
        Some((cx.round() as u16, cy.round() as u16))
    }

    /// Resolve a click against the last rendered layout.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        if contains(self.legend_area, column, row) {
            let series = (row - self.legend_area.y) as usize;
            let view = self.series.get(series)?;
            return Some(Hit::Legend {
                series,
                identity: view.identity.clone(),
            });
        }

        let (series, index) = self.nearest_point(column, row)?;
        Some(Hit::Point {
            series,
            identity: self.series[series].identity.clone(),
            index,
        })
    }

    fn nearest_point(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        if !contains(self.graph_area, column, row) {
            return None;
        }

        let mut best: Option<(f64, usize, usize)> = None;
        for (si, view) in self.series.iter().enumerate().filter(|(_, v)| v.visible) {
            for (pi, &(x, y)) in view.coords.iter().enumerate() {
                let (cx, cy) = self.bounds.to_cell(self.graph_area, x, y);
                let dx = cx - column as f64;
                // Cells are roughly twice as tall as they are wide
                let dy = (cy - row as f64) * 2.0;
                let distance = (dx * dx + dy * dy).sqrt();

                if distance <= PICK_RADIUS && best.map_or(true, |(d, _, _)| distance < d) {
                    best = Some((distance, si, pi));
                }
            }
        }

        best.map(|(_, si, pi)| (si, pi))
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(inner);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(self.legend_width())])
            .split(rows[0]);

        self.render_plot(frame, columns[0]);
        self.render_legend(frame, columns[1]);
        self.render_status(frame, rows[1]);
        self.render_annotation(frame);

        self.needs_redraw = false;
    }

    fn legend_width(&self) -> u16 {
        let longest = self
            .series
            .iter()
            .map(|s| s.identity.chars().count())
            .max()
            .unwrap_or(0);
        (longest as u16 + 16).clamp(18, 32)
    }

    fn render_plot(&mut self, frame: &mut Frame, area: Rect) {
        let y_labels = [
            format!("{:.0}", self.bounds.y[1]),
            format!("{:.0}", (self.bounds.y[0] + self.bounds.y[1]) / 2.0),
            format!("{:.0}", self.bounds.y[0]),
        ];
        let label_width = y_labels.iter().map(|l| l.len()).max().unwrap_or(1) as u16 + 1;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(area);
        let graph_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(label_width), Constraint::Min(4)])
            .split(rows[1]);
        self.graph_area = graph_row[1];

        frame.render_widget(
            Paragraph::new("Retweet count").style(Style::default().fg(Color::Gray)),
            rows[0],
        );

        // Top, middle and bottom rows carry the y labels
        let height = graph_row[0].height as usize;
        let mut label_lines = vec![Line::from(""); height];
        if height > 0 {
            label_lines[0] = Line::from(y_labels[0].clone());
            label_lines[height / 2] = Line::from(y_labels[1].clone());
            label_lines[height - 1] = Line::from(y_labels[2].clone());
        }
        frame.render_widget(
            Paragraph::new(label_lines)
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray)),
            graph_row[0],
        );

        let x_label_area = Rect {
            x: self.graph_area.x,
            y: rows[2].y,
            width: self.graph_area.width,
            height: rows[2].height,
        };
        let x_labels = [
            format_date(self.bounds.x[0]),
            format_date((self.bounds.x[0] + self.bounds.x[1]) / 2.0),
            format_date(self.bounds.x[1]),
        ];
        frame.render_widget(
            Paragraph::new(spread_labels(x_label_area.width as usize, &x_labels))
                .style(Style::default().fg(Color::DarkGray)),
            x_label_area,
        );

        let highlight: Vec<(f64, f64)> = self
            .highlight
            .and_then(|(si, pi)| {
                let view = self.series.get(si).filter(|v| v.visible)?;
                view.coords.get(pi).copied()
            })
            .into_iter()
            .collect();

        let mut datasets = Vec::new();
        for view in self.series.iter().filter(|v| v.visible) {
            let color = PALETTE[view.style % PALETTE.len()];
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(&view.coords),
            );
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                    .data(&view.coords),
            );
        }
        if !highlight.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(Color::White))
                    .data(&highlight),
            );
        }

        let chart = Chart::new(datasets)
            .x_axis(Axis::default().bounds(self.bounds.x))
            .y_axis(Axis::default().bounds(self.bounds.y))
            .legend_position(None);
        frame.render_widget(chart, self.graph_area);
    }

    fn render_legend(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Legend ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        self.legend_area = block.inner(area);

        let items: Vec<ListItem> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let color = PALETTE[view.style % PALETTE.len()];
                let line = if view.visible {
                    Line::from(vec![
                        Span::styled("■ ", Style::default().fg(color)),
                        Span::styled(
                            format!("{} @{}", i + 1, view.identity),
                            Style::default().fg(Color::White),
                        ),
                        Span::styled(
                            format!(" ({})", view.coords.len()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                } else {
                    Line::from(vec![
                        Span::styled("□ ", Style::default().fg(Color::DarkGray)),
                        Span::styled(
                            format!("{} @{}", i + 1, view.identity),
                            Style::default()
                                .fg(Color::DarkGray)
                                .add_modifier(Modifier::CROSSED_OUT),
                        ),
                    ])
                };
                ListItem::new(line)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let text = self.status.as_deref().unwrap_or(HELP_TEXT);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn render_annotation(&self, frame: &mut Frame) {
        let Some((point, lines)) = &self.annotation else {
            return;
        };

        let screen = frame.area();
        let content_width = lines
            .iter()
            .map(|l| textwrap::core::display_width(l))
            .max()
            .unwrap_or(0) as u16;
        let width = (content_width + 2).min(screen.width);
        let height = (lines.len() as u16 + 2).min(screen.height);

        let (cx, cy) = self
            .bounds
            .to_cell(self.graph_area, point.x.timestamp() as f64, point.y as f64);
        let (cx, cy) = (cx.round() as u16, cy.round() as u16);

        // Right of the point if it fits, otherwise to its left
        let mut x = cx.saturating_add(2);
        if x.saturating_add(width) > screen.right() {
            x = cx.saturating_sub(width + 1).max(screen.x);
        }
        let y = cy.min(screen.bottom().saturating_sub(height)).max(screen.y);

        let popup = Rect::new(x, y, width, height);
        let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Black).bg(Color::White)),
            ),
            popup,
        );
    }
}

impl PlotSurface for ChartWidget {
    fn draw_series(&mut self, series: &[Series]) {
        self.series = series
            .iter()
            .map(|s| SeriesView {
                identity: s.identity.clone(),
                coords: s.coords(),
                style: s.style,
                visible: true,
            })
            .collect();
        self.bounds = Bounds::fit(&self.series);
        self.highlight = None;
    }

    fn set_series_visible(&mut self, identity: &str, visible: bool) {
        if let Some(view) = self.series.iter_mut().find(|s| s.identity == identity) {
            view.visible = visible;
        }
    }

    fn annotate(&mut self, at: Point, text: &str) {
        let lines = textwrap::wrap(text, ANNOTATION_WIDTH)
            .into_iter()
            .map(|line| line.into_owned())
            .collect();
        self.annotation = Some((at, lines));
    }

    fn clear_annotation(&mut self) {
        self.annotation = None;
    }

    fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Lay out start, middle and end labels across `width` columns. The middle
/// one is dropped when there is no room for it.
fn spread_labels(width: usize, labels: &[String; 3]) -> String {
    let [start, middle, end] = labels;
    let mut row = vec![' '; width];
    let mut place = |at: usize, label: &str| {
        for (offset, c) in label.chars().enumerate() {
            if let Some(cell) = row.get_mut(at + offset) {
                *cell = c;
            }
        }
    };

    let (start_len, middle_len, end_len) = (
        start.chars().count(),
        middle.chars().count(),
        end.chars().count(),
    );
    place(0, start.as_str());
    if width >= start_len + end_len + 1 {
        place(width - end_len, end.as_str());
    }
    if width >= start_len + middle_len + end_len + 4 {
        place((width - middle_len) / 2, middle.as_str());
    }

    row.into_iter().collect()
}

fn format_date(seconds: f64) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn series(identity: &str, style: usize, points: &[(u32, u64)]) -> Series {
        Series {
            identity: identity.to_string(),
            points: points
                .iter()
                .map(|&(day, y)| Point {
                    x: Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0).unwrap(),
                    y,
                })
                .collect(),
            style,
        }
    }

    fn rendered(widget: &mut ChartWidget, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| widget.render(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn widget_with(series_list: &[Series]) -> ChartWidget {
        let mut widget = ChartWidget::new("Retweet counts".to_string());
        widget.draw_series(series_list);
        widget
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let widget = widget_with(&[
            series("alice", 0, &[(1, 10), (5, 2)]),
            series("bob", 1, &[(3, 20)]),
        ]);
        let bounds = widget.bounds();
        let day1 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().timestamp() as f64;
        let day5 = Utc.with_ymd_and_hms(2020, 1, 5, 0, 0, 0).unwrap().timestamp() as f64;
        assert_eq!(bounds.x, [day1, day5]);
        assert_eq!(bounds.y, [0.0, 22.0]);
    }

    #[test]
    fn test_bounds_single_point_are_padded() {
        let widget = widget_with(&[series("alice", 0, &[(1, 0)])]);
        let bounds = widget.bounds();
        assert_eq!(bounds.x[1] - bounds.x[0], 86_400.0);
        assert_eq!(bounds.y, [0.0, 1.0]);
    }

    #[test]
    fn test_bounds_empty() {
        let widget = widget_with(&[series("alice", 0, &[])]);
        assert_eq!(widget.bounds(), Bounds::default());
    }

    #[test]
    fn test_render_shows_title_and_legend() {
        let mut widget = widget_with(&[
            series("alice", 0, &[(1, 10), (5, 2)]),
            series("bob", 1, &[(3, 20)]),
        ]);
        let screen = rendered(&mut widget, 100, 30);

        assert!(screen.contains("Retweet counts"));
        assert!(screen.contains("Retweet count"));
        assert!(screen.contains("1 @alice"));
        assert!(screen.contains("2 @bob"));
        assert!(screen.contains("2020-01-01"));
        assert!(!widget.needs_redraw());
    }

    #[test]
    fn test_click_on_point_hits_it() {
        let mut widget = widget_with(&[
            series("alice", 0, &[(1, 10), (5, 2)]),
            series("bob", 1, &[(3, 20)]),
        ]);
        rendered(&mut widget, 100, 30);

        let (column, row) = widget.point_cell(1, 0).unwrap();
        assert_eq!(
            widget.hit_test(column, row),
            Some(Hit::Point {
                series: 1,
                identity: "bob".to_string(),
                index: 0,
            })
        );
    }

    #[test]
    fn test_click_near_point_within_radius() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10), (5, 2)])]);
        rendered(&mut widget, 100, 30);

        let (column, row) = widget.point_cell(0, 1).unwrap();
        let hit = widget.hit_test(column - 1, row);
        assert!(matches!(hit, Some(Hit::Point { index: 1, .. })));
    }

    #[test]
    fn test_click_on_empty_space_misses() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 0), (31, 0)])]);
        rendered(&mut widget, 100, 30);

        // Top of the graph, far from both points on the bottom edge
        let (column, _) = widget.point_cell(0, 0).unwrap();
        let top = widget.graph_area.y;
        assert_eq!(widget.hit_test(column + 20, top), None);
    }

    #[test]
    fn test_hidden_series_cannot_be_hit() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10), (5, 2)])]);
        widget.set_series_visible("alice", false);
        rendered(&mut widget, 100, 30);

        let (column, row) = widget.point_cell(0, 0).unwrap();
        assert_eq!(widget.hit_test(column, row), None);
        assert!(!widget.is_series_visible("alice"));
    }

    #[test]
    fn test_click_on_legend_row() {
        let mut widget = widget_with(&[
            series("alice", 0, &[(1, 10)]),
            series("bob", 1, &[(3, 20)]),
        ]);
        rendered(&mut widget, 100, 30);

        let legend = widget.legend_area;
        assert_eq!(
            widget.hit_test(legend.x + 1, legend.y + 1),
            Some(Hit::Legend {
                series: 1,
                identity: "bob".to_string(),
            })
        );
        // Below the last entry
        assert_eq!(widget.hit_test(legend.x + 1, legend.y + 5), None);
    }

    #[test]
    fn test_annotation_wraps_and_renders() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10), (5, 2)])]);
        let at = Point {
            x: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            y: 10,
        };
        let text = "\"a fairly long tweet that will not fit on one line\" - 10 retweets - @alice";
        widget.annotate(at, text);

        let lines = widget.annotation_lines().unwrap();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= ANNOTATION_WIDTH));

        let screen = rendered(&mut widget, 100, 30);
        assert!(screen.contains("10 retweets"));
    }

    #[test]
    fn test_annotate_replaces_previous() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10)])]);
        let at = Point {
            x: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            y: 10,
        };
        widget.annotate(at, "first");
        widget.annotate(at, "second");
        assert_eq!(widget.annotation_lines().unwrap(), ["second".to_string()]);

        widget.clear_annotation();
        assert!(widget.annotation_lines().is_none());
        // Clearing twice is fine
        widget.clear_annotation();
    }

    #[test]
    fn test_spread_labels() {
        let labels = ["aa".to_string(), "mm".to_string(), "zz".to_string()];
        assert_eq!(spread_labels(12, &labels), "aa   mm   zz");
        assert_eq!(spread_labels(6, &labels), "aa  zz");
        assert_eq!(spread_labels(3, &labels), "aa ");
    }

    #[test]
    fn test_redraw_flag() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10)])]);
        rendered(&mut widget, 80, 24);
        assert!(!widget.needs_redraw());
        widget.request_redraw();
        assert!(widget.needs_redraw());
    }

    #[test]
    fn test_status_replaces_help() {
        let mut widget = widget_with(&[series("alice", 0, &[(1, 10)])]);
        widget.set_status(Some("@bob: Rate limit exceeded".to_string()));
        let screen = rendered(&mut widget, 100, 30);
        assert!(screen.contains("Rate limit exceeded"));
        assert!(!screen.contains("Esc clear"));
    }
}
