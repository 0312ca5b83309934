use super::annotations::AnnotationIndex;
use crate::feeds::Record;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: DateTime<Utc>,
    pub y: u64,
}

/// The points drawn for one account, in the order its records were fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub identity: String,
    pub points: Vec<Point>,
    /// Palette slot, assigned in input order.
    pub style: usize,
}

impl Series {
    /// `(unix seconds, retweets)` pairs for the chart.
    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.x.timestamp() as f64, p.y as f64))
            .collect()
    }

    /// Point indices ordered oldest first.
    pub fn chronological(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by_key(|&i| (self.points[i].x, self.points[i].y));
        order
    }
}

/// Tooltip text for a tweet, e.g. `"hi" - 5 retweets - @alice - 2021-03-04 05:06:07 UTC`.
pub fn display_text(record: &Record, identity: &str) -> String {
    format!(
        "\"{}\" - {} retweets - @{} - {} UTC",
        record.text,
        record.retweet_count,
        identity,
        record.timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Turn each account's filtered records into a series and index every point.
///
/// Two tweets from one account with the same timestamp and retweet count
/// share a key; the one built last wins.
pub fn build_series(histories: &[(String, Vec<Record>)]) -> (Vec<Series>, AnnotationIndex) {
    let mut index = AnnotationIndex::new();
    let mut series = Vec::with_capacity(histories.len());

    for (style, (identity, records)) in histories.iter().enumerate() {
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            points.push(Point {
                x: record.timestamp,
                y: record.retweet_count,
            });
            index.insert(
                identity,
                record.timestamp,
                record.retweet_count,
                display_text(record, identity),
            );
        }

        series.push(Series {
            identity: identity.clone(),
            points,
            style,
        });
    }

    (series, index)
}
