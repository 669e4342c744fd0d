//! Interactive terminal dashboard
//!
//! One tab per page. Press Tab to switch pages, 1-5 to pick a range,
//! r to refresh, q/Esc to quit.

mod app;
mod draw;

pub use app::{App, FetchCommand, FetchOutcome};

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::insights::InsightsApi;

fn spawn_fetches(
    api: &Arc<dyn InsightsApi>,
    tx: &mpsc::UnboundedSender<FetchOutcome>,
    commands: Vec<FetchCommand>,
) {
    for command in commands {
        let api = Arc::clone(api);
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = command.run(api.as_ref()).await;
            // receiver is gone once the UI has quit
            let _ = tx.send(outcome);
        });
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Run the dashboard until the user quits
pub async fn run(mut app: App, api: Arc<dyn InsightsApi>, tick: Duration) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_fetches(&api, &tx, app.mount());
    tracing::info!("Dashboard started");

    let result = loop {
        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        if let Err(e) = terminal.draw(|f| draw::draw(f, &app)) {
            break Err(e);
        }

        match event::poll(tick) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    let commands = app.handle_key(key);
                    spawn_fetches(&api, &tx, commands);
                }
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        if app.should_quit {
            break Ok(());
        }
        app.tick = app.tick.wrapping_add(1);
    };

    restore_terminal()?;
    terminal.show_cursor()?;
    tracing::info!("Dashboard closed");
    result
}
