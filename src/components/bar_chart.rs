//! Bar Chart
//!
//! Grouped horizontal bars scaled to the series maximum.

use serde::Serialize;

/// Shown instead of a chart with no points
pub const EMPTY_MESSAGE: &str = "No data available";

const BAR_CHAR: char = '█';

/// Scale values to percentages of the largest value.
///
/// All heights are zero when the maximum is not positive.
pub fn bar_heights(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max.is_nan() || max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / max * 100.0).collect()
}

/// A bar of `width * percent / 100` block characters
pub fn text_bar(percent: f64, width: usize) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 100.0 * width as f64).round() as usize;
    std::iter::repeat(BAR_CHAR).take(filled).collect()
}

/// One named series of values, aligned with the chart's labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Grouped bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub labels: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            series: Vec::new(),
        }
    }

    pub fn series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push(BarSeries {
            name: name.into(),
            values,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Text rendering: one block per label, one bar per series. Bars share a
    /// common scale across every series.
    pub fn lines(&self, width: usize) -> Vec<String> {
        if self.is_empty() {
            return vec![EMPTY_MESSAGE.to_string()];
        }

        // one value per (series, label), missing points as zero
        let count = self.labels.len();
        let values: Vec<f64> = self
            .series
            .iter()
            .flat_map(|s| (0..count).map(move |i| s.values.get(i).copied().unwrap_or(0.0)))
            .collect();
        let heights = bar_heights(&values);
        let name_width = self.series.iter().map(|s| s.name.chars().count()).max().unwrap_or(0);

        let mut out = Vec::new();
        for (i, label) in self.labels.iter().enumerate() {
            out.push(label.clone());
            for (j, s) in self.series.iter().enumerate() {
                let value = values[j * count + i];
                let percent = heights[j * count + i];
                out.push(format!(
                    "  {:<name_width$} {} {:.1}",
                    s.name,
                    text_bar(percent, width),
                    value,
                ));
            }
        }
        out
    }
}
