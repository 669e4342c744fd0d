//! Page Controllers
//!
//! Each page owns a date-range selection (plus page-specific dependencies),
//! fetches on mount and on every dependency change, holds its own
//! loading/error/data state and derives view-ready structures from the
//! fetched payload. Pages never share state.
//!
//! ## Pages
//!
//! - [`DashboardPage`]: overview cards and top campaigns (two concurrent fetches)
//! - [`SenderPage`]: per-sender rates, chart series and summary
//! - [`CampaignsPage`]: ranked campaigns with local re-sorting
//! - [`FunnelPage`]: funnel stages, drop-off and threshold insights

pub mod campaigns;
pub mod dashboard;
pub mod funnel;
pub mod loadable;
pub mod senders;

pub use campaigns::{CampaignRow, CampaignSort, CampaignsPage, SortField, SortOrder};
pub use dashboard::{DashboardData, DashboardPage, DashboardRequest, DashboardView, TopCampaignRow};
pub use funnel::{FunnelInsight, FunnelPage};
pub use loadable::{Loadable, PageView, Ticket};
pub use senders::{SenderChartPoint, SenderPage, SenderRow, SenderSummary};

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;

use crate::format::{DateRange, RangePreset};
use crate::insights::{InsightsApi, InsightsResult};

/// The four routed pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Dashboard,
    Senders,
    Campaigns,
    Funnel,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Dashboard,
        PageKind::Senders,
        PageKind::Campaigns,
        PageKind::Funnel,
    ];

    /// Short name used for tabs
    pub fn tab(self) -> &'static str {
        match self {
            PageKind::Dashboard => "Dashboard",
            PageKind::Senders => "Senders",
            PageKind::Campaigns => "Campaigns",
            PageKind::Funnel => "Funnel",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PageKind::Dashboard => "Dashboard Overview",
            PageKind::Senders => "Sender Performance",
            PageKind::Campaigns => "Campaign Analytics",
            PageKind::Funnel => "Funnel Analysis",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            PageKind::Dashboard => "Comprehensive analytics for your email campaigns",
            PageKind::Senders => "Analyze performance metrics by sender",
            PageKind::Campaigns => "Top performing campaigns ranked by selected metric",
            PageKind::Funnel => "Track lead progression through conversion stages",
        }
    }

    pub fn loading_text(self) -> &'static str {
        match self {
            PageKind::Dashboard => "Loading dashboard...",
            PageKind::Senders => "Loading sender performance...",
            PageKind::Campaigns => "Loading campaign analytics...",
            PageKind::Funnel => "Loading funnel analysis...",
        }
    }

    /// Presets offered by the page's range selector
    pub fn range_options(self) -> &'static [RangePreset] {
        match self {
            PageKind::Dashboard => &[
                RangePreset::Today,
                RangePreset::Week,
                RangePreset::Month,
                RangePreset::Quarter,
            ],
            _ => &[RangePreset::Week, RangePreset::Month, RangePreset::Quarter],
        }
    }

    pub fn default_range(self) -> RangePreset {
        match self {
            PageKind::Dashboard | PageKind::Senders => RangePreset::Week,
            PageKind::Campaigns | PageKind::Funnel => RangePreset::Month,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PageKind::Dashboard => 0,
            PageKind::Senders => 1,
            PageKind::Campaigns => 2,
            PageKind::Funnel => 3,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab())
    }
}

/// Date window a page queries: a preset re-anchored on every fetch, or a
/// fixed custom range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    Preset(RangePreset),
    Custom(DateRange),
}

impl RangeSelection {
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        match self {
            RangeSelection::Preset(preset) => DateRange::from_preset(*preset, today),
            RangeSelection::Custom(range) => *range,
        }
    }

    pub fn preset(&self) -> Option<RangePreset> {
        match self {
            RangeSelection::Preset(preset) => Some(*preset),
            RangeSelection::Custom(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            RangeSelection::Preset(preset) => preset.label().to_string(),
            RangeSelection::Custom(range) => range.to_string(),
        }
    }
}

impl From<RangePreset> for RangeSelection {
    fn from(preset: RangePreset) -> Self {
        RangeSelection::Preset(preset)
    }
}

impl From<DateRange> for RangeSelection {
    fn from(range: DateRange) -> Self {
        RangeSelection::Custom(range)
    }
}

/// Switch `current` to `preset` when the page offers it.
///
/// Returns `true` when the selection changed and the page must refetch.
pub(crate) fn select_range(kind: PageKind, current: &mut RangeSelection, preset: RangePreset) -> bool {
    if !kind.range_options().contains(&preset) || current.preset() == Some(preset) {
        return false;
    }
    *current = RangeSelection::Preset(preset);
    true
}

/// Shared fetch/derive/render pipeline of a page
#[async_trait]
pub trait PageController: Send {
    /// Everything one fetch needs, computed from the page's dependencies
    type Request: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;
    /// Raw payload kept between fetches
    type Data: Send + 'static;

    const KIND: PageKind;

    fn range(&self) -> &RangeSelection;

    /// Select a preset from the page's range options.
    ///
    /// Returns `true` when the page must refetch.
    fn set_range(&mut self, preset: RangePreset) -> bool;

    fn request(&self, today: NaiveDate) -> Self::Request;

    async fn fetch(api: &dyn InsightsApi, request: &Self::Request) -> InsightsResult<Self::Data>;

    fn state(&self) -> &Loadable<Self::Data>;

    fn state_mut(&mut self) -> &mut Loadable<Self::Data>;

    /// Enter `loading` and compute the request for the current dependencies
    fn start(&mut self, today: NaiveDate) -> (Ticket, Self::Request) {
        let request = self.request(today);
        let ticket = self.state_mut().begin();
        tracing::debug!(page = %Self::KIND, ?request, "Page fetch started");
        (ticket, request)
    }

    /// Apply a finished fetch; stale tickets are ignored
    fn complete(&mut self, ticket: Ticket, result: InsightsResult<Self::Data>) -> bool {
        if let Err(e) = &result {
            if self.state().is_current(ticket) {
                tracing::warn!(page = %Self::KIND, error = %e, "Page fetch failed");
            }
        }
        self.state_mut().finish(ticket, result)
    }

    /// Fetch and apply in one step
    async fn refresh(&mut self, api: &dyn InsightsApi, today: NaiveDate) -> bool {
        let (ticket, request) = self.start(today);
        let result = Self::fetch(api, &request).await;
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_options() {
        assert_eq!(PageKind::Dashboard.range_options().len(), 4);
        assert!(!PageKind::Funnel.range_options().contains(&RangePreset::Today));
        for kind in PageKind::ALL {
            assert!(kind.range_options().contains(&kind.default_range()));
            assert_eq!(PageKind::ALL[kind.index()], kind);
        }
    }

    #[test]
    fn test_select_range() {
        let mut current = RangeSelection::Preset(RangePreset::Week);
        assert!(!select_range(PageKind::Senders, &mut current, RangePreset::Week));
        assert!(!select_range(PageKind::Senders, &mut current, RangePreset::Today));
        assert!(select_range(PageKind::Senders, &mut current, RangePreset::Month));
        assert_eq!(current, RangeSelection::Preset(RangePreset::Month));
    }

    #[test]
    fn test_custom_selection_is_replaced_by_preset() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let custom = DateRange::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), today).unwrap();
        let mut current = RangeSelection::from(custom);

        assert_eq!(current.resolve(today), custom);
        assert!(select_range(PageKind::Dashboard, &mut current, RangePreset::Week));
        assert_eq!(current.resolve(today), DateRange::from_preset(RangePreset::Week, today));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn failure() -> InsightsResult<crate::insights::FunnelData> {
        Err(crate::insights::InsightsError::Status {
            status: 500,
            message: "Request failed with status code 500".to_string(),
        })
    }

    #[test]
    fn test_superseded_failure_is_not_logged_as_failure() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let mut page = FunnelPage::new();
        tracing::subscriber::with_default(subscriber, || {
            let (old, _) = page.start(today);
            let (new, _) = page.start(today);

            assert!(!page.complete(old, failure()));
            assert!(!logs.text().contains("Page fetch failed"));

            assert!(page.complete(new, failure()));
            assert!(logs.text().contains("Page fetch failed"));
        });
        assert_eq!(page.state().error(), Some("Request failed with status code 500"));
    }
}
