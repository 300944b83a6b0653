//! Time-series chart rendered as labeled sparklines.

use crate::api::TimedValue;
use chrono::Local;
use colored::{Color, Colorize};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A named series to draw.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub color: Color,
    pub data: Vec<TimedValue>,
}

/// Label each sample by its minute (`9:25 PM 10/06/2020`). Samples sharing a
/// label collapse into one point that keeps the first position and the last
/// value.
pub fn create_graph_dataset(data: &[TimedValue]) -> Vec<(String, f64)> {
    let mut points: Vec<(String, f64)> = Vec::with_capacity(data.len());
    for sample in data {
        let label = sample
            .time
            .with_timezone(&Local)
            .format("%-I:%M %p %m/%d/%Y")
            .to_string();
        match points.iter_mut().find(|(l, _)| *l == label) {
            Some(point) => point.1 = sample.value,
            None => points.push((label, sample.value)),
        }
    }
    points
}

/// One bar per value, scaled between the series' min and max.
pub fn sparkline(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[0]
            } else {
                let level = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Chart with an optional primary series plus extra collections. Series with
/// no data are skipped.
pub fn render_chart(title: &str, unit: &str, data: &[TimedValue], collections: &[Series]) -> String {
    let mut lines = vec![title.bold().to_string()];

    let primary = (!data.is_empty()).then(|| Series {
        name: title.to_string(),
        color: Color::Cyan,
        data: data.to_vec(),
    });

    for series in primary.iter().chain(collections.iter()) {
        let points = create_graph_dataset(&series.data);
        if points.is_empty() {
            continue;
        }
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        let latest = values.last().copied().unwrap_or_default();
        let (first_label, last_label) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.0.as_str(), last.0.as_str()),
            _ => ("", ""),
        };

        lines.push(format!(
            "  {} {} {}{}",
            series.name,
            sparkline(&values).color(series.color),
            latest,
            unit
        ));
        lines.push(format!("    {} .. {}", first_label, last_label).dimmed().to_string());
    }

    if lines.len() == 1 {
        lines.push("  no data yet".dimmed().to_string());
    }
    lines.join("\n")
}
