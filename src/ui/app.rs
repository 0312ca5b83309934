use std::time::Duration;

use anyhow::Result;
use ratatui::{backend::Backend, Terminal};

use super::events::{self, Action};
use super::widgets::chart::{ChartWidget, Hit};
use crate::plot::{PlotController, PlotSurface};

/// Interactive session: routes clicks and keys to the plot controller and
/// redraws the chart when something changed.
pub struct App {
    controller: PlotController,
    chart: ChartWidget,
    focus: usize,
    /// Position in the focused series' chronological order
    cursor: Option<usize>,
    running: bool,
}

impl App {
    pub fn new(controller: PlotController, title: String, status: Option<String>) -> Self {
        let mut chart = ChartWidget::new(title);
        chart.set_status(status);
        controller.attach(&mut chart);

        Self {
            controller,
            chart,
            focus: 0,
            cursor: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn controller(&self) -> &PlotController {
        &self.controller
    }

    pub fn chart(&self) -> &ChartWidget {
        &self.chart
    }

    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            if self.chart.needs_redraw() {
                terminal.draw(|frame| self.chart.render(frame))?;
            }
            let action = events::poll_action(Duration::from_millis(250))?;
            self.handle(action);
        }
        Ok(())
    }

    pub fn handle(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ClearAnnotation => {
                self.controller.clear_annotation(&mut self.chart);
                self.chart.set_highlight(None);
                self.cursor = None;
            }
            Action::ToggleSeries(n) => {
                if let Some(identity) = self.identity_at(n) {
                    self.controller.on_legend_click(&identity, &mut self.chart);
                }
            }
            Action::NextSeries => {
                let count = self.controller.series().len();
                if count > 0 {
                    self.focus = (self.focus + 1) % count;
                    self.cursor = None;
                }
            }
            Action::StepPoint(delta) => self.step_point(delta),
            Action::Click { column, row } => self.click(column, row),
            Action::Resize => self.chart.request_redraw(),
            Action::None => {}
        }
    }

    fn identity_at(&self, series: usize) -> Option<String> {
        self.controller.series().get(series).map(|s| s.identity.clone())
    }

    fn click(&mut self, column: u16, row: u16) {
        match self.chart.hit_test(column, row) {
            Some(Hit::Point {
                series,
                identity,
                index,
            }) => {
                self.focus = series;
                self.cursor = self.controller.series()[series]
                    .chronological()
                    .iter()
                    .position(|&i| i == index);
                self.pick(series, &identity, index);
            }
            Some(Hit::Legend { identity, .. }) => {
                self.controller.on_legend_click(&identity, &mut self.chart);
            }
            None => {}
        }
    }

    fn step_point(&mut self, delta: isize) {
        let Some(series) = self.controller.series().get(self.focus) else {
            return;
        };
        let order = series.chronological();
        if order.is_empty() {
            return;
        }
        let identity = series.identity.clone();

        let last = order.len() - 1;
        let position = match self.cursor {
            None if delta < 0 => last,
            None => 0,
            Some(current) => current.saturating_add_signed(delta).min(last),
        };
        self.cursor = Some(position);
        self.pick(self.focus, &identity, order[position]);
    }

    fn pick(&mut self, series: usize, identity: &str, index: usize) {
        let shown = self
            .controller
            .on_pick(identity, index, &mut self.chart)
            .is_some();
        self.chart.set_highlight(shown.then_some((series, index)));
    }
}
