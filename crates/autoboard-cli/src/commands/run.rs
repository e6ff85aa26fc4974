use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use autoboard_core::{AppConfig, LeaderboardClient, RefreshEvent, RefreshService};
use autoboard_tui::{
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    widgets::{BoardWidget, StatusBarWidget},
    App, Theme,
};

pub async fn run(config: AppConfig) -> Result<()> {
    let client = Arc::new(LeaderboardClient::new(&config.source)?);
    info!("Polling leaderboard at {}", client.url());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RefreshEvent>();
    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel::<()>();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let service = RefreshService::new(
        client,
        Duration::from_secs(config.source.refresh_interval_secs),
        event_tx,
    );
    let service_handle = tokio::spawn(service.run(trigger_rx, shutdown_rx));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        SetTitle("Autoboard")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.is_refreshing = true;

    let result = run_loop(&mut terminal, &mut app, &mut event_rx, &trigger_tx);

    // Stop the poller before handing the terminal back
    let _ = shutdown_tx.send(true);
    if let Err(e) = service_handle.await {
        warn!("Refresh service ended abnormally: {}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<RefreshEvent>,
    trigger_tx: &mpsc::UnboundedSender<()>,
) -> Result<()> {
    let theme = Theme::default();
    let event_handler = EventHandler::new();

    // Panels learn their viewport size from the first draw
    draw(terminal, app, &theme)?;

    loop {
        // Process any completed polls (non-blocking)
        while let Ok(event) = event_rx.try_recv() {
            app.apply_refresh(event);
        }

        app.tick();

        draw(terminal, app, &theme)?;

        match event_handler.next(app.poll_timeout())? {
            Some(AppEvent::Key(key)) => {
                app.clear_status();
                match handle_key_event(key) {
                    Action::Quit => app.should_quit = true,
                    Action::FocusNext => app.focus_next(),
                    Action::FocusPrev => app.focus_prev(),
                    Action::ClearFocus => app.clear_focus(),
                    Action::TogglePause => app.toggle_pause(),
                    Action::Refresh => {
                        if trigger_tx.send(()).is_ok() {
                            app.is_refreshing = true;
                        } else {
                            app.set_status("Refresh service is not running");
                        }
                    }
                    Action::None => {}
                }
            }
            Some(AppEvent::PointerMoved(column, row)) => app.pointer_moved(column, row),
            Some(AppEvent::FocusGained) => app.set_visible(true),
            Some(AppEvent::FocusLost) => app.set_visible(false),
            Some(AppEvent::Resize(_, _)) => {
                // Record the new viewport heights before re-evaluating overflow
                terminal.autoresize()?;
                draw(terminal, app, &theme)?;
                app.restart_scrolling();
            }
            Some(AppEvent::Tick) | None => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Draw the three boards side by side above the status bar
fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &App, theme: &Theme) -> Result<()> {
    terminal.draw(|frame| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(
                app.panels
                    .iter()
                    .map(|_| Constraint::Ratio(1, app.panels.len() as u32)),
            )
            .split(chunks[0]);

        for (index, area) in columns.iter().enumerate() {
            BoardWidget::render(frame, *area, app, index, theme);
        }
        StatusBarWidget::render(frame, chunks[1], app, theme);
    })?;
    Ok(())
}
