//! Mailscope CLI
//!
//! Command-line interface for email campaign insights:
//! - Interactive dashboard (`tui`)
//! - One-shot page reports (dashboard, senders, campaigns, funnel)
//! - Quick summary and raw export
//! - Default config generation

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use mailscope::config::{generate_default_config, Config, LoadedConfig};
use mailscope::format::{today, DateRange, RangePreset};
use mailscope::insights::{ExportFormat, InsightsApi, InsightsClient, RankingMetric};
use mailscope::logging::{self, LogMode};
use mailscope::pages::{
    CampaignSort, CampaignsPage, DashboardPage, FunnelPage, PageController, PageKind, RangeSelection,
    SenderPage, SortField, SortOrder,
};
use mailscope::render::{self, OutputFormat};
use mailscope::tui::{self, App};

#[derive(Parser)]
#[command(name = "mailscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Email campaign insights in the terminal")]
#[command(long_about = "Mailscope reads pre-aggregated campaign analytics from an insights API.\nBrowse the dashboard interactively or print any page as a table, JSON or CSV.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Insights API base URL (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Date range preset: today, week, month, quarter, year
    #[arg(short, long, global = true)]
    range: Option<RangePreset>,

    /// Custom range start (YYYY-MM-DD), requires --to
    #[arg(long, global = true)]
    from: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD), requires --from
    #[arg(long, global = true)]
    to: Option<NaiveDate>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output_format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard
    Tui,

    /// Overview metrics and top campaigns
    Dashboard,

    /// Performance by sender
    Senders,

    /// Campaigns ranked by a metric
    Campaigns {
        /// Ranking metric (open_rate, click_rate, engagement_score)
        #[arg(short, long)]
        metric: Option<RankingMetric>,
        /// Number of campaigns
        #[arg(short, long)]
        limit: Option<u32>,
        /// Local sort (ranked, sent, click_rate, open_rate, date)
        #[arg(short, long, default_value = "ranked")]
        sort: SortField,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },

    /// Delivered -> opened -> clicked -> replied funnel
    Funnel,

    /// Quick summary of recent activity
    Summary {
        /// Days to cover
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Export insights from the API
    Export {
        /// Export format (json, csv)
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_output(output.as_deref(), &generate_default_config());
    }

    let loaded = match &cli.config {
        Some(path) => LoadedConfig {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            rejected: Vec::new(),
        },
        None => Config::load_default(),
    };
    let mut config = loaded.config.clone();
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    let mode = match cli.command {
        Commands::Tui => LogMode::Interactive,
        _ => LogMode::Cli,
    };
    logging::init(&config.logging, mode)?;
    loaded.report();
    if mode == LogMode::Interactive && config.logging.file.is_none() {
        // interactive logs are discarded; keep rejected files visible
        for message in loaded.rejection_messages() {
            eprintln!("Warning: {}", message);
        }
    }
    tracing::debug!(base_url = %config.api.base_url, "Mailscope v{}", env!("CARGO_PKG_VERSION"));

    let selection = range_selection(cli.range, cli.from, cli.to)?;
    let client = InsightsClient::new(config.api.insights_config())?;
    let format = cli.output_format;
    let today = today();

    match cli.command {
        Commands::Tui => {
            let app = App::from_config(&config, selection);
            let api: Arc<dyn InsightsApi> = Arc::new(client);
            tui::run(app, api, Duration::from_millis(config.tui.tick_ms)).await?;
        }

        Commands::Dashboard => {
            let mut page = DashboardPage::new()
                .with_range(page_range(PageKind::Dashboard, selection, &config)?)
                .with_campaign_limit(config.pages.dashboard_campaign_limit);
            load(&mut page, &client, today).await?;
            print!("{}", render::dashboard(&page, format)?);
        }

        Commands::Senders => {
            let mut page =
                SenderPage::new().with_range(page_range(PageKind::Senders, selection, &config)?);
            load(&mut page, &client, today).await?;
            print!("{}", render::senders(&page, format)?);
        }

        Commands::Campaigns {
            metric,
            limit,
            sort,
            asc,
        } => {
            let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
            let mut page = CampaignsPage::new()
                .with_range(page_range(PageKind::Campaigns, selection, &config)?)
                .with_metric(metric.unwrap_or(config.pages.campaign_metric))
                .with_limit(limit.unwrap_or(config.pages.campaign_limit))
                .with_sort(CampaignSort::new(sort, order));
            load(&mut page, &client, today).await?;
            print!("{}", render::campaigns(&page, format)?);
        }

        Commands::Funnel => {
            let mut page =
                FunnelPage::new().with_range(page_range(PageKind::Funnel, selection, &config)?);
            load(&mut page, &client, today).await?;
            print!("{}", render::funnel(&page, format)?);
        }

        Commands::Summary { days } => {
            let days = days.unwrap_or(config.pages.summary_days);
            if days == 0 {
                bail!("--days must be greater than zero");
            }
            let summary = client.summary(days).await?;
            print!("{}", render::summary(&summary, days, format)?);
        }

        Commands::Export {
            format: export_format,
            output,
        } => {
            let range = match selection {
                Some(selection) => selection.resolve(today),
                None => DateRange::from_preset(RangePreset::Month, today),
            };
            let payload = client.export(export_format, &range).await?;
            write_output(output.as_deref(), &payload.to_text())?;
            if let Some(path) = output {
                tracing::info!("Exported {} insights to {:?}", export_format.as_str(), path);
            }
        }

        // written before any config is loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// `--from/--to` win over `--range`; both bounds are required together
fn range_selection(
    range: Option<RangePreset>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> anyhow::Result<Option<RangeSelection>> {
    match (from, to) {
        (Some(from), Some(to)) => Ok(Some(RangeSelection::Custom(DateRange::new(from, to)?))),
        (None, None) => Ok(range.map(RangeSelection::Preset)),
        _ => bail!("--from and --to must be given together"),
    }
}

/// Range for a one-shot page: the command-line selection or the configured
/// default. A preset the page does not offer is an error.
fn page_range(
    kind: PageKind,
    selection: Option<RangeSelection>,
    config: &Config,
) -> anyhow::Result<RangeSelection> {
    if let Some(RangeSelection::Preset(preset)) = selection {
        if !kind.range_options().contains(&preset) {
            let offered: Vec<&str> = kind.range_options().iter().map(|p| p.as_str()).collect();
            bail!(
                "range {} is not offered by the {} page (expected one of: {})",
                preset,
                kind,
                offered.join(", ")
            );
        }
    }
    Ok(config.pages.selection_for(kind, selection))
}

/// Refresh a page and surface its error
async fn load<P: PageController>(page: &mut P, api: &dyn InsightsApi, today: NaiveDate) -> anyhow::Result<()> {
    page.refresh(api, today).await;
    if let Some(error) = page.state().error() {
        bail!("{}", error);
    }
    Ok(())
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
            eprintln!("Written to {:?}", path);
        }
        None => print!("{}", content),
    }
    Ok(())
}
