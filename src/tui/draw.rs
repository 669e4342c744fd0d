//! Drawing

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use super::app::App;
use crate::components::{drop_off_lines, funnel_lines, loading_line, ErrorPanel, MetricCard};
use crate::format::{format_percentage, format_with_commas, RangePreset, Tone};
use crate::pages::campaigns::campaign_rows;
use crate::pages::funnel::total_drop_off;
use crate::pages::senders::{chart, sender_rows, summarize};
use crate::pages::{
    DashboardView, FunnelInsight, PageController, PageKind, PageView, RangeSelection, SortField,
};

const CHART_WIDTH: usize = 24;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Length(4), // page header
            Constraint::Min(8),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_header(f, app, chunks[1]);
    match app.selected() {
        PageKind::Dashboard => draw_page(f, app, &app.dashboard, chunks[2], draw_dashboard),
        PageKind::Senders => draw_page(f, app, &app.senders, chunks[2], draw_senders),
        PageKind::Campaigns => draw_page(f, app, &app.campaigns, chunks[2], draw_campaigns),
        PageKind::Funnel => draw_page(f, app, &app.funnel, chunks[2], draw_funnel),
    }
    draw_footer(f, app, chunks[3]);
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
        Tone::Info => Color::Cyan,
        Tone::Default => Color::White,
    }
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = PageKind::ALL
        .iter()
        .map(|kind| {
            let mut spans = vec![Span::raw(kind.tab())];
            if app.is_loading(*kind) {
                spans.push(Span::styled(" …", Style::default().fg(Color::Yellow)));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Mailscope "))
        .select(app.selected().index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(bold(Color::White));

    f.render_widget(tabs, area);
}

fn range_line(kind: PageKind, selection: &RangeSelection) -> Line<'static> {
    let mut spans = vec![Span::styled("Range: ", Style::default().fg(Color::DarkGray))];
    if let RangeSelection::Custom(range) = selection {
        spans.push(Span::styled(range.to_string(), bold(Color::White)));
        return Line::from(spans);
    }

    for (i, preset) in RangePreset::ALL.iter().enumerate() {
        if !kind.range_options().contains(preset) {
            continue;
        }
        let label = format!("[{}] {}  ", i + 1, preset.label());
        if selection.preset() == Some(*preset) {
            spans.push(Span::styled(label, bold(Color::Cyan)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
    }
    Line::from(spans)
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let kind = app.selected();
    let selection = match kind {
        PageKind::Dashboard => app.dashboard.range(),
        PageKind::Senders => app.senders.range(),
        PageKind::Campaigns => app.campaigns.range(),
        PageKind::Funnel => app.funnel.range(),
    };

    let mut lines = vec![
        Line::from(Span::styled(kind.title(), bold(Color::White))),
        Line::from(Span::styled(kind.subtitle(), Style::default().fg(Color::Gray))),
        range_line(kind, selection),
    ];
    if kind == PageKind::Campaigns {
        lines.push(Line::from(vec![
            Span::styled("Metric: ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.campaigns.metric().label(), bold(Color::Cyan)),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

/// Loading/error panels around the page-specific body
fn draw_page<P: PageController>(
    f: &mut Frame,
    app: &App,
    page: &P,
    area: Rect,
    body: fn(&mut Frame, &App, &P::Data, Rect),
) {
    match page.state().view() {
        PageView::Loading => {
            let text = loading_line(P::KIND.loading_text(), app.tick);
            let block = Block::default().borders(Borders::ALL);
            f.render_widget(Paragraph::new(text).block(block), area);
        }
        PageView::Failed(message) => {
            let panel = ErrorPanel::new(message);
            let lines: Vec<Line> = panel
                .lines()
                .into_iter()
                .enumerate()
                .map(|(i, text)| match i {
                    0 => Line::from(Span::styled(text, bold(Color::Red))),
                    3 => Line::from(Span::styled(text, bold(Color::Yellow))),
                    _ => Line::from(text),
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red));
            f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
        }
        PageView::Ready(data) => body(f, app, data, area),
    }
}

fn card_widget(card: &MetricCard) -> Paragraph<'_> {
    let mut value = vec![Span::styled(card.value.as_str(), bold(tone_color(card.tone)))];
    if let Some(trend) = card.trend_text() {
        value.push(Span::raw(format!("  {}", trend)));
    }
    let mut lines = vec![Line::from(value)];
    if let Some(subtitle) = &card.subtitle {
        lines.push(Line::from(Span::styled(
            subtitle.as_str(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", card.title)),
    )
}

fn draw_cards(f: &mut Frame, cards: &[MetricCard], area: Rect) {
    if cards.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);
    for (card, column) in cards.iter().zip(columns.iter()) {
        f.render_widget(card_widget(card), *column);
    }
}

fn header_row(cells: Vec<String>) -> Row<'static> {
    Row::new(cells).style(bold(Color::Yellow)).bottom_margin(1)
}

fn draw_dashboard(f: &mut Frame, _app: &App, data: &crate::pages::DashboardData, area: Rect) {
    let view = DashboardView::from_data(data);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(4),
        ])
        .split(area);

    draw_cards(f, &view.cards, chunks[0]);
    draw_cards(f, &view.stats, chunks[1]);

    let rows: Vec<Row> = view
        .campaigns
        .iter()
        .map(|c| {
            Row::new(vec![
                Span::raw(c.subject.clone()),
                Span::raw(c.emails_sent.clone()),
                Span::styled(c.open_rate.clone(), Style::default().fg(tone_color(c.open_tone))),
                Span::styled(c.click_rate.clone(), Style::default().fg(tone_color(c.click_tone))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header_row(vec![
        "Subject".into(),
        "Sent".into(),
        "Open Rate".into(),
        "Click Rate".into(),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Top Campaigns "));

    f.render_widget(table, chunks[2]);
}

fn draw_senders(
    f: &mut Frame,
    _app: &App,
    data: &Vec<crate::insights::SenderPerformance>,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let chart_lines: Vec<Line> = chart(data).lines(CHART_WIDTH).into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(chart_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Open & Click Rates by Sender "),
        ),
        chunks[0],
    );

    let rows: Vec<Row> = sender_rows(data)
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Span::raw(format!("{} {}", r.initial, r.sender)),
                Span::raw(r.emails_sent),
                Span::raw(r.recipients),
                Span::raw(r.campaigns),
                Span::styled(r.open_rate, Style::default().fg(tone_color(r.open_tone))),
                Span::styled(r.click_rate, Style::default().fg(tone_color(r.click_tone))),
                Span::raw(r.ctr),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header_row(
        ["Sender", "Emails Sent", "Recipients", "Campaigns", "Open Rate", "Click Rate", "CTR"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    ))
    .block(Block::default().borders(Borders::ALL).title(" Sender Details "));
    f.render_widget(table, chunks[1]);

    let summary = match summarize(data) {
        Some(s) => format!(
            "Senders: {}   Emails Sent: {}   Avg Open Rate: {}   Avg Click Rate: {}",
            data.len(),
            format_with_commas(s.total_emails_sent as f64),
            format_percentage(s.average_open_rate, 1),
            format_percentage(s.average_click_rate, 1),
        ),
        None => "No senders in this range".to_string(),
    };
    f.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title(" Summary ")),
        chunks[2],
    );
}

fn draw_campaigns(f: &mut Frame, app: &App, data: &Vec<crate::insights::CampaignSummary>, area: Rect) {
    let sort = app.campaigns.sort();
    let heading = |label: &str, field: SortField| {
        if sort.field == field {
            format!("{} {}", label, sort.order.arrow())
        } else {
            label.to_string()
        }
    };

    let rows: Vec<Row> = campaign_rows(&sort, data)
        .into_iter()
        .map(|r| {
            Row::new(vec![
                Span::raw(r.subject),
                Span::styled(r.short_id, Style::default().fg(Color::DarkGray)),
                Span::raw(r.emails_sent),
                Span::styled(r.open_rate, Style::default().fg(tone_color(r.open_tone))),
                Span::styled(r.click_rate, Style::default().fg(tone_color(r.click_tone))),
                Span::raw(r.created),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(24),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header_row(vec![
        "Subject".into(),
        "ID".into(),
        heading("Sent", SortField::Sent),
        heading("Open Rate", SortField::OpenRate),
        heading("Click Rate", SortField::ClickRate),
        heading("Date", SortField::Date),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" All Emails ({}) ", app.campaigns.ranking_caption())),
    );

    f.render_widget(table, area);
}

fn draw_funnel(f: &mut Frame, _app: &App, data: &crate::insights::FunnelData, area: Rect) {
    let insights = FunnelInsight::evaluate(data);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(insights.len() as u16 + 2),
        ])
        .split(area);

    let overall = MetricCard::new(
        "Overall Conversion Rate",
        format_percentage(data.overall_conversion_rate.unwrap_or(0.0), 1),
    )
    .subtitle("From delivered to replied")
    .tone(Tone::Success);
    let drop = MetricCard::new(
        "Total Drop-Off",
        total_drop_off(data)
            .map(|d| format_with_commas(d as f64))
            .unwrap_or_default(),
    )
    .subtitle("Leads lost across all stages")
    .tone(Tone::Danger);
    draw_cards(f, &[overall, drop], chunks[0]);

    let mut lines: Vec<Line> = funnel_lines(&data.stages, CHART_WIDTH)
        .into_iter()
        .map(Line::from)
        .collect();
    if let Some(drop_off) = &data.drop_off {
        lines.push(Line::from(""));
        for (label, value) in drop_off_lines(drop_off) {
            lines.push(Line::from(vec![
                Span::raw(format!("{}: ", label)),
                Span::styled(
                    format!("-{}", format_with_commas(value as f64)),
                    Style::default().fg(Color::Red),
                ),
            ]));
        }
    }
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Conversion Funnel "),
        ),
        chunks[1],
    );

    let insight_lines: Vec<Line> = insights
        .iter()
        .map(|insight| {
            Line::from(vec![
                Span::styled(insight.title(), bold(tone_color(insight.tone()))),
                Span::raw(format!("  {}", insight.text())),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(insight_lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Insights & Recommendations "),
            ),
        chunks[2],
    );
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, bold(Color::Yellow));
    let mut spans = vec![
        key(" Tab"),
        Span::raw(" page  "),
        key("1-5"),
        Span::raw(" range  "),
        key("r"),
        Span::raw(" refresh  "),
    ];
    if app.selected() == PageKind::Campaigns {
        spans.extend([
            key("m"),
            Span::raw(" metric  "),
            key("s/o/c/d"),
            Span::raw(" sort  "),
        ]);
    }
    spans.extend([key("q"), Span::raw(" quit")]);
    if let Some(notice) = app.notice() {
        spans.push(Span::styled(
            format!("   Refresh failed: {}", notice),
            Style::default().fg(Color::Red),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
