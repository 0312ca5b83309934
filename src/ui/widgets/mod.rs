pub mod chart;

pub use chart::{ChartWidget, Hit};
