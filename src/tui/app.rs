//! Terminal UI state and key handling
//!
//! Key handling is pure: it mutates the [`App`] and returns the fetches the
//! event loop should start. Fetch outcomes come back through [`App::apply`],
//! which drops results superseded by a later fetch of the same page.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::config::Config;
use crate::format::{today, DateRange, RangePreset};
use crate::insights::{CampaignSummary, FunnelData, InsightsApi, InsightsResult, SenderPerformance, TopCampaignsQuery};
use crate::pages::{
    CampaignsPage, DashboardData, DashboardPage, DashboardRequest, FunnelPage, Loadable, PageController,
    PageKind, RangeSelection, SenderPage, SortField, Ticket,
};

/// A fetch to run off the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCommand {
    Dashboard(Ticket, DashboardRequest),
    Senders(Ticket, DateRange),
    Campaigns(Ticket, TopCampaignsQuery),
    Funnel(Ticket, DateRange),
}

/// Result of a [`FetchCommand`], tagged with its ticket
#[derive(Debug)]
pub enum FetchOutcome {
    Dashboard(Ticket, InsightsResult<DashboardData>),
    Senders(Ticket, InsightsResult<Vec<SenderPerformance>>),
    Campaigns(Ticket, InsightsResult<Vec<CampaignSummary>>),
    Funnel(Ticket, InsightsResult<FunnelData>),
}

impl FetchCommand {
    pub fn kind(&self) -> PageKind {
        match self {
            FetchCommand::Dashboard(..) => PageKind::Dashboard,
            FetchCommand::Senders(..) => PageKind::Senders,
            FetchCommand::Campaigns(..) => PageKind::Campaigns,
            FetchCommand::Funnel(..) => PageKind::Funnel,
        }
    }

    pub async fn run(self, api: &dyn InsightsApi) -> FetchOutcome {
        match self {
            FetchCommand::Dashboard(ticket, request) => {
                FetchOutcome::Dashboard(ticket, DashboardPage::fetch(api, &request).await)
            }
            FetchCommand::Senders(ticket, range) => {
                FetchOutcome::Senders(ticket, SenderPage::fetch(api, &range).await)
            }
            FetchCommand::Campaigns(ticket, query) => {
                FetchOutcome::Campaigns(ticket, CampaignsPage::fetch(api, &query).await)
            }
            FetchCommand::Funnel(ticket, range) => {
                FetchOutcome::Funnel(ticket, FunnelPage::fetch(api, &range).await)
            }
        }
    }
}

fn stale_error<T>(state: &Loadable<T>) -> Option<&str> {
    if state.has_stale_error() {
        state.error()
    } else {
        None
    }
}

/// Whole-screen state
pub struct App {
    pub dashboard: DashboardPage,
    pub senders: SenderPage,
    pub campaigns: CampaignsPage,
    pub funnel: FunnelPage,
    selected: PageKind,
    mounted: [bool; 4],
    pub should_quit: bool,
    pub tick: u64,
    clock: fn() -> NaiveDate,
}

impl App {
    pub fn new(dashboard: DashboardPage, senders: SenderPage, campaigns: CampaignsPage, funnel: FunnelPage) -> Self {
        Self {
            dashboard,
            senders,
            campaigns,
            funnel,
            selected: PageKind::Dashboard,
            mounted: [false; 4],
            should_quit: false,
            tick: 0,
            clock: today,
        }
    }

    /// Pages seeded from the configuration.
    ///
    /// `range` applies to every page that offers it; the others keep their
    /// configured default.
    pub fn from_config(config: &Config, range: Option<RangeSelection>) -> Self {
        let pages = &config.pages;
        Self::new(
            DashboardPage::new()
                .with_range(pages.selection_for(PageKind::Dashboard, range))
                .with_campaign_limit(pages.dashboard_campaign_limit),
            SenderPage::new().with_range(pages.selection_for(PageKind::Senders, range)),
            CampaignsPage::new()
                .with_range(pages.selection_for(PageKind::Campaigns, range))
                .with_metric(pages.campaign_metric)
                .with_limit(pages.campaign_limit),
            FunnelPage::new().with_range(pages.selection_for(PageKind::Funnel, range)),
        )
    }

    /// Replace the source of "today" used to anchor presets
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn selected(&self) -> PageKind {
        self.selected
    }

    pub fn is_loading(&self, kind: PageKind) -> bool {
        match kind {
            PageKind::Dashboard => self.dashboard.state().is_loading(),
            PageKind::Senders => self.senders.state().is_loading(),
            PageKind::Campaigns => self.campaigns.state().is_loading(),
            PageKind::Funnel => self.funnel.state().is_loading(),
        }
    }

    /// Error of a failed reload while older data stays on screen
    pub fn notice(&self) -> Option<&str> {
        match self.selected {
            PageKind::Dashboard => stale_error(self.dashboard.state()),
            PageKind::Senders => stale_error(self.senders.state()),
            PageKind::Campaigns => stale_error(self.campaigns.state()),
            PageKind::Funnel => stale_error(self.funnel.state()),
        }
    }

    /// First fetch of the selected page; nothing once it is mounted
    pub fn mount(&mut self) -> Vec<FetchCommand> {
        let index = self.selected.index();
        if self.mounted[index] {
            return Vec::new();
        }
        self.mounted[index] = true;
        vec![self.start(self.selected)]
    }

    fn start(&mut self, kind: PageKind) -> FetchCommand {
        let today = (self.clock)();
        match kind {
            PageKind::Dashboard => {
                let (ticket, request) = self.dashboard.start(today);
                FetchCommand::Dashboard(ticket, request)
            }
            PageKind::Senders => {
                let (ticket, range) = self.senders.start(today);
                FetchCommand::Senders(ticket, range)
            }
            PageKind::Campaigns => {
                let (ticket, query) = self.campaigns.start(today);
                FetchCommand::Campaigns(ticket, query)
            }
            PageKind::Funnel => {
                let (ticket, range) = self.funnel.start(today);
                FetchCommand::Funnel(ticket, range)
            }
        }
    }

    fn select(&mut self, kind: PageKind) -> Vec<FetchCommand> {
        self.selected = kind;
        self.mount()
    }

    fn set_range(&mut self, preset: RangePreset) -> bool {
        match self.selected {
            PageKind::Dashboard => self.dashboard.set_range(preset),
            PageKind::Senders => self.senders.set_range(preset),
            PageKind::Campaigns => self.campaigns.set_range(preset),
            PageKind::Funnel => self.funnel.set_range(preset),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<FetchCommand> {
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        let pages = PageKind::ALL.len();
        let index = self.selected.index();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Tab | KeyCode::Right => self.select(PageKind::ALL[(index + 1) % pages]),
            KeyCode::BackTab | KeyCode::Left => {
                self.select(PageKind::ALL[index.checked_sub(1).unwrap_or(pages - 1)])
            }
            KeyCode::Char(c @ '1'..='5') => {
                let preset = RangePreset::ALL[(c as u8 - b'1') as usize];
                if self.set_range(preset) {
                    vec![self.start(self.selected)]
                } else {
                    Vec::new()
                }
            }
            KeyCode::Char('r') => vec![self.start(self.selected)],
            KeyCode::Char('m') if self.selected == PageKind::Campaigns => {
                let next = self.campaigns.metric().next();
                if self.campaigns.set_metric(next) {
                    vec![self.start(PageKind::Campaigns)]
                } else {
                    Vec::new()
                }
            }
            KeyCode::Char(c @ ('s' | 'c' | 'o' | 'd')) if self.selected == PageKind::Campaigns => {
                let field = match c {
                    's' => SortField::Sent,
                    'c' => SortField::ClickRate,
                    'o' => SortField::OpenRate,
                    _ => SortField::Date,
                };
                self.campaigns.toggle_sort(field);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Apply a finished fetch; `false` when it was superseded
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            FetchOutcome::Dashboard(ticket, result) => self.dashboard.complete(ticket, result),
            FetchOutcome::Senders(ticket, result) => self.senders.complete(ticket, result),
            FetchOutcome::Campaigns(ticket, result) => self.campaigns.complete(ticket, result),
            FetchOutcome::Funnel(ticket, result) => self.funnel.complete(ticket, result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::fake::{campaign, ScriptedApi};
    use crate::insights::{InsightsError, OverviewMetrics, RankingMetric};
    use crate::pages::{PageView, SortOrder};
    use crossterm::event::KeyModifiers;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn app() -> App {
        App::from_config(&Config::default(), None).with_clock(fixed_today)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn status(code: u16) -> InsightsError {
        InsightsError::Status {
            status: code,
            message: format!("Request failed with status code {}", code),
        }
    }

    #[test]
    fn test_mount_once_per_page() {
        let mut app = app();
        let commands = app.mount();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].kind(), PageKind::Dashboard);
        assert!(app.mount().is_empty());

        let commands = app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.selected(), PageKind::Senders);
        assert_eq!(commands.len(), 1);

        // back to the mounted dashboard: no refetch
        assert!(app.handle_key(press(KeyCode::BackTab)).is_empty());
        assert_eq!(app.selected(), PageKind::Dashboard);

        // wraps around to the last page
        let commands = app.handle_key(press(KeyCode::Left));
        assert_eq!(app.selected(), PageKind::Funnel);
        assert_eq!(commands[0].kind(), PageKind::Funnel);
    }

    #[test]
    fn test_range_keys_only_accept_offered_presets() {
        let mut app = app();
        app.mount();

        assert!(app.handle_key(press(KeyCode::Char('2'))).is_empty());
        assert!(app.handle_key(press(KeyCode::Char('5'))).is_empty());

        let commands = app.handle_key(press(KeyCode::Char('3')));
        match &commands[..] {
            [FetchCommand::Dashboard(_, request)] => {
                assert_eq!(
                    request.overview.range,
                    DateRange::from_preset(RangePreset::Month, fixed_today())
                );
            }
            other => panic!("unexpected commands: {:?}", other),
        }

        app.handle_key(press(KeyCode::Tab));
        assert!(app.handle_key(press(KeyCode::Char('1'))).is_empty());
    }

    #[test]
    fn test_stale_outcome_is_dropped() {
        let mut app = app();
        let first = app.mount().remove(0);
        let second = app.handle_key(press(KeyCode::Char('r'))).remove(0);

        let (FetchCommand::Dashboard(old, _), FetchCommand::Dashboard(new, _)) = (first, second) else {
            panic!("expected dashboard fetches");
        };

        let data = DashboardData {
            overview: OverviewMetrics::default(),
            top_campaigns: vec![campaign("new", 1, 1.0, 1.0)],
        };
        assert!(app.apply(FetchOutcome::Dashboard(new, Ok(data))));
        assert!(!app.apply(FetchOutcome::Dashboard(old, Err(status(500)))));

        assert!(matches!(app.dashboard.state().view(), PageView::Ready(_)));
        assert_eq!(app.notice(), None);
    }

    #[test]
    fn test_failed_reload_shows_notice() {
        let mut app = app();
        let FetchCommand::Dashboard(first, _) = app.mount().remove(0) else {
            panic!("expected dashboard fetch");
        };
        app.apply(FetchOutcome::Dashboard(
            first,
            Ok(DashboardData {
                overview: OverviewMetrics::default(),
                top_campaigns: Vec::new(),
            }),
        ));

        let FetchCommand::Dashboard(retry, _) = app.handle_key(press(KeyCode::Char('r'))).remove(0) else {
            panic!("expected dashboard fetch");
        };
        assert!(app.is_loading(PageKind::Dashboard));
        app.apply(FetchOutcome::Dashboard(retry, Err(status(502))));

        assert_eq!(app.notice(), Some("Request failed with status code 502"));
        assert!(!app.is_loading(PageKind::Dashboard));
    }

    #[test]
    fn test_campaign_keys() {
        let mut app = app();
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.selected(), PageKind::Campaigns);

        assert!(app.handle_key(press(KeyCode::Char('s'))).is_empty());
        assert_eq!(app.campaigns.sort().field, SortField::Sent);
        app.handle_key(press(KeyCode::Char('s')));
        assert_eq!(app.campaigns.sort().order, SortOrder::Asc);

        let commands = app.handle_key(press(KeyCode::Char('m')));
        match &commands[..] {
            [FetchCommand::Campaigns(_, query)] => assert_eq!(query.metric, RankingMetric::ClickRate),
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_campaign_keys_ignored_elsewhere() {
        let mut app = app();
        assert!(app.handle_key(press(KeyCode::Char('m'))).is_empty());
        app.handle_key(press(KeyCode::Char('s')));
        assert_eq!(app.campaigns.sort().field, SortField::Ranked);
    }

    #[test]
    fn test_from_config_range_override() {
        let app = App::from_config(&Config::default(), Some(RangePreset::Today.into()))
            .with_clock(fixed_today);
        assert_eq!(app.dashboard.range(), &RangeSelection::Preset(RangePreset::Today));
        assert_eq!(app.senders.range(), &RangeSelection::Preset(RangePreset::Week));
        assert_eq!(app.funnel.range(), &RangeSelection::Preset(RangePreset::Month));

        let october = DateRange::new(
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            fixed_today(),
        )
        .unwrap();
        let mut app = App::from_config(&Config::default(), Some(RangeSelection::Custom(october)))
            .with_clock(fixed_today);
        match app.mount().remove(0) {
            FetchCommand::Dashboard(_, request) => assert_eq!(request.overview.range, october),
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(app.campaigns.range(), &RangeSelection::Custom(october));
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_command_runs_against_api() {
        let api = ScriptedApi::new();
        api.push_campaigns(Ok(vec![campaign("a", 5, 10.0, 1.0)]));

        let mut app = app();
        app.handle_key(press(KeyCode::Tab));
        let commands = app.handle_key(press(KeyCode::Tab));
        let outcome = commands[0].clone().run(&api).await;

        assert!(app.apply(outcome));
        assert_eq!(app.campaigns.rows().len(), 1);
    }
}
