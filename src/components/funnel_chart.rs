//! Funnel Chart
//!
//! Stage bars sized relative to the first stage, with conversion between
//! consecutive stages and the drop-off breakdown.

use serde::Serialize;

use super::bar_chart::text_bar;
use crate::format::{format_percentage, format_with_commas};
use crate::insights::{DropOff, FunnelStage};

/// Shown instead of a chart with no stages
pub const EMPTY_MESSAGE: &str = "No funnel data available";

const MIN_WIDTH: f64 = 8.0;
const ZERO_WIDTH: f64 = 3.0;

/// Bar width of a stage in percent of the first stage
pub fn stage_width(count: u64, max: u64) -> f64 {
    if count == 0 {
        return ZERO_WIDTH;
    }
    let max = max.max(1) as f64;
    (count as f64 / max * 100.0).max(MIN_WIDTH)
}

/// One rendered funnel stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelRow {
    pub stage: String,
    pub count: u64,
    pub percentage: f64,
    /// Conversion into the next stage; never set on the last row
    pub conversion_rate: Option<f64>,
    pub width: f64,
}

pub fn funnel_rows(stages: &[FunnelStage]) -> Vec<FunnelRow> {
    let max = stages.first().map(|s| s.count).unwrap_or(0).max(1);
    let last = stages.len().saturating_sub(1);

    stages
        .iter()
        .enumerate()
        .map(|(i, stage)| FunnelRow {
            stage: stage.stage.clone(),
            count: stage.count,
            percentage: stage.percentage,
            conversion_rate: if i < last { stage.conversion_rate } else { None },
            width: stage_width(stage.count, max),
        })
        .collect()
}

/// Labelled drop-off deltas between consecutive stages
pub fn drop_off_lines(drop_off: &DropOff) -> [(&'static str, i64); 3] {
    [
        ("Delivered → Opened", drop_off.delivered_to_opened),
        ("Opened → Clicked", drop_off.opened_to_clicked),
        ("Clicked → Replied", drop_off.clicked_to_replied),
    ]
}

/// Text rendering of the funnel
pub fn funnel_lines(stages: &[FunnelStage], width: usize) -> Vec<String> {
    let rows = funnel_rows(stages);
    if rows.is_empty() {
        return vec![EMPTY_MESSAGE.to_string()];
    }

    let label_width = rows.iter().map(|r| r.stage.chars().count()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(rows.len() * 2);
    for row in rows {
        out.push(format!(
            "{:<label_width$} {} {} ({})",
            row.stage,
            text_bar(row.width, width),
            format_with_commas(row.count as f64),
            format_percentage(row.percentage, 1),
        ));
        if let Some(rate) = row.conversion_rate {
            out.push(format!(
                "{:<label_width$}   ↓ {} conversion",
                "",
                format_percentage(rate, 1)
            ));
        }
    }
    out
}
