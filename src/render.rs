//! Text rendering of pages for one-shot commands

use serde::Serialize;
use serde_json::json;

use crate::components::{drop_off_lines, funnel_lines, MetricCard, TextTable};
use crate::format::{format_percentage, format_with_commas};
use crate::insights::QuickSummary;
use crate::pages::campaigns::campaign_rows;
use crate::pages::funnel::{stage_caption, total_drop_off};
use crate::pages::senders::{chart, sender_rows, summarize};
use crate::pages::{
    CampaignsPage, DashboardPage, DashboardView, FunnelInsight, FunnelPage, PageController, SenderPage,
    SortField,
};

const CHART_WIDTH: usize = 30;

/// Output format of one-shot commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn header<P: PageController>(page: &P) -> String {
    let kind = P::KIND;
    format!(
        "{}\n{}\nRange: {}\n",
        kind.title(),
        kind.subtitle(),
        page.range().label()
    )
}

fn cards(out: &mut String, cards: &[MetricCard]) {
    for card in cards {
        out.push_str(&card.line());
        out.push('\n');
    }
}

pub fn dashboard(page: &DashboardPage, format: OutputFormat) -> Result<String, RenderError> {
    let Some(data) = page.state().data() else {
        return Ok(String::new());
    };
    let view = DashboardView::from_data(data);

    let mut table = TextTable::new(["Subject", "Sent", "Open Rate", "Click Rate"]);
    for row in &view.campaigns {
        table.row([
            row.subject.as_str(),
            row.emails_sent.as_str(),
            row.open_rate.as_str(),
            row.click_rate.as_str(),
        ]);
    }

    match format {
        OutputFormat::Json => to_json(data),
        OutputFormat::Csv => Ok(table.to_csv()?),
        OutputFormat::Table => {
            let mut out = header(page);
            out.push('\n');
            cards(&mut out, &view.cards);
            out.push('\n');
            cards(&mut out, &view.stats);
            out.push_str("\nTop Campaigns\n");
            if table.is_empty() {
                out.push_str("No campaigns in this range\n");
            } else {
                out.push_str(&table.render());
                out.push('\n');
            }
            Ok(out)
        }
    }
}

pub fn senders(page: &SenderPage, format: OutputFormat) -> Result<String, RenderError> {
    let Some(data) = page.state().data() else {
        return Ok(String::new());
    };

    let mut table = TextTable::new([
        "Sender",
        "Emails Sent",
        "Recipients",
        "Campaigns",
        "Open Rate",
        "Click Rate",
        "CTR",
    ]);
    for row in sender_rows(data) {
        table.row([
            row.sender,
            row.emails_sent,
            row.recipients,
            row.campaigns,
            row.open_rate,
            row.click_rate,
            row.ctr,
        ]);
    }

    match format {
        OutputFormat::Json => to_json(&json!({
            "senders": data,
            "summary": summarize(data),
        })),
        OutputFormat::Csv => Ok(table.to_csv()?),
        OutputFormat::Table => {
            let mut out = header(page);
            out.push_str("\nOpen & Click Rates by Sender\n");
            for line in chart(data).lines(CHART_WIDTH) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push_str("\nSender Details\n");
            out.push_str(&table.render());
            out.push('\n');
            if let Some(summary) = summarize(data) {
                out.push('\n');
                cards(
                    &mut out,
                    &[
                        MetricCard::new("Total Senders", data.len().to_string()),
                        MetricCard::new(
                            "Total Emails Sent",
                            format_with_commas(summary.total_emails_sent as f64),
                        ),
                        MetricCard::new(
                            "Avg Open Rate",
                            format_percentage(summary.average_open_rate, 1),
                        ),
                        MetricCard::new(
                            "Avg Click Rate",
                            format_percentage(summary.average_click_rate, 1),
                        ),
                    ],
                );
            }
            Ok(out)
        }
    }
}

pub fn campaigns(page: &CampaignsPage, format: OutputFormat) -> Result<String, RenderError> {
    let Some(data) = page.state().data() else {
        return Ok(String::new());
    };
    let sort = page.sort();

    let mut table = TextTable::new(["Subject", "ID", "Sent", "Open Rate", "Click Rate", "Date"]);
    for row in campaign_rows(&sort, data) {
        table.row([
            row.subject,
            row.short_id,
            row.emails_sent,
            row.open_rate,
            row.click_rate,
            row.created,
        ]);
    }

    match format {
        OutputFormat::Json => to_json(&sort.apply(data)),
        OutputFormat::Csv => Ok(table.to_csv()?),
        OutputFormat::Table => {
            let mut out = header(page);
            out.push_str(&format!("\nAll Emails ({})\n", page.ranking_caption()));
            if sort.field != SortField::Ranked {
                out.push_str(&format!("Sorted by {} {}\n", sort.field, sort.order.arrow()));
            }
            if table.is_empty() {
                out.push_str("No campaigns in this range\n");
            } else {
                out.push_str(&table.render());
                out.push('\n');
            }
            Ok(out)
        }
    }
}

pub fn funnel(page: &FunnelPage, format: OutputFormat) -> Result<String, RenderError> {
    let Some(data) = page.state().data() else {
        return Ok(String::new());
    };
    let insights = FunnelInsight::evaluate(data);
    let last = data.stages.len().saturating_sub(1);

    let mut table = TextTable::new(["#", "Stage", "Count", "Percentage", "Conversion Rate"]);
    for (i, stage) in data.stages.iter().enumerate() {
        let conversion = match stage.conversion_rate {
            Some(rate) if i < last => format_percentage(rate, 1),
            _ => String::new(),
        };
        table.row([
            (i + 1).to_string(),
            stage.stage.clone(),
            format_with_commas(stage.count as f64),
            format_percentage(stage.percentage, 1),
            conversion,
        ]);
    }

    match format {
        OutputFormat::Json => to_json(&json!({
            "funnel": data,
            "total_drop_off": total_drop_off(data),
            "insights": insights.iter().map(|i| i.title()).collect::<Vec<_>>(),
        })),
        OutputFormat::Csv => Ok(table.to_csv()?),
        OutputFormat::Table => {
            let mut out = header(page);
            out.push('\n');
            let overall = MetricCard::new(
                "Overall Conversion Rate",
                format_percentage(data.overall_conversion_rate.unwrap_or(0.0), 1),
            )
            .subtitle("From delivered to replied");
            let drop = MetricCard::new(
                "Total Drop-Off",
                total_drop_off(data)
                    .map(|d| format_with_commas(d as f64))
                    .unwrap_or_default(),
            )
            .subtitle("Leads lost across all stages");
            cards(&mut out, &[overall, drop]);

            out.push_str("\nConversion Funnel\n");
            for line in funnel_lines(&data.stages, CHART_WIDTH) {
                out.push_str(&line);
                out.push('\n');
            }
            if let Some(drop_off) = &data.drop_off {
                for (label, value) in drop_off_lines(drop_off) {
                    out.push_str(&format!("  {}: -{}\n", label, format_with_commas(value as f64)));
                }
            }

            if !table.is_empty() {
                out.push_str("\nStage Details\n");
                out.push_str(&table.render());
                out.push('\n');
                for (i, stage) in data.stages.iter().enumerate() {
                    if let Some(caption) = stage_caption(i) {
                        out.push_str(&format!("  {}. {}: {}\n", i + 1, stage.stage, caption));
                    }
                }
            }

            out.push_str("\nInsights & Recommendations\n");
            for insight in &insights {
                out.push_str(&format!("  {}: {}\n", insight.title(), insight.text()));
            }
            Ok(out)
        }
    }
}

pub fn summary(summary: &QuickSummary, days: u32, format: OutputFormat) -> Result<String, RenderError> {
    let mut table = TextTable::new(["Metric", "Value"]);
    for (key, value) in summary.entries() {
        table.row([key, value]);
    }

    match format {
        OutputFormat::Json => to_json(summary),
        OutputFormat::Csv => Ok(table.to_csv()?),
        OutputFormat::Table => {
            if table.is_empty() {
                return Ok(format!("No summary for the last {} days\n", days));
            }
            Ok(format!(
                "Summary (last {} days)\n\n{}\n",
                days,
                table.render()
            ))
        }
    }
}
