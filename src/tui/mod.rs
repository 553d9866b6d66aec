// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard/mouse input, inbound chat events, redraw ticks)
// - Routing keys to the compose line and the log view

pub mod app;
pub mod compose;
pub mod log_view;
pub mod ui;

use crate::transport::ChannelEvent;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal afterwards even if the loop errors.
pub async fn run_tui(mut app: App, mut event_rx: mpsc::Receiver<ChannelEvent>) -> Result<()> {
    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &mut event_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Three event sources, multiplexed with tokio::select!:
/// 1. Terminal input (typing, scrolling, quitting)
/// 2. Inbound chat events from the transport queue, in delivery order
/// 3. A periodic tick so the status line stays fresh
///
/// Chat events mutate the log view only from here, one at a time, which
/// keeps the measure-then-append step of the autoscroll heuristic atomic.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::Receiver<ChannelEvent>,
) -> Result<()> {
    // Periodic redraws at 5 FPS; input and chat events redraw immediately
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    // Once the transport queue closes it stays closed; stop polling it
    let mut queue_open = true;

    loop {
        // Draw the UI
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard or mouse input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => handle_key_event(app, key_event),
                        Ok(Event::Mouse(mouse_event)) => handle_mouse_event(app, mouse_event),
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick for redrawing
            _ = tick_interval.tick() => {}

            // Inbound chat events
            event = event_rx.recv(), if queue_open => {
                match event {
                    Some(event) => app.handle_event(event),
                    None => {
                        queue_open = false;
                        app.handle_disconnect();
                    }
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
///
/// Printable keys edit the compose line; vertical navigation scrolls the
/// log; Enter submits. Enter is fully consumed here, so submission has no
/// side effect beyond the emit-and-clear.
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    // Key-up notifications (kitty protocol, Windows) are not actions
    if key_event.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl-C always quits; the usual 'q' binding would swallow typed text
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key_event.code {
            app.should_quit = true;
        }
        return;
    }

    match key_event.code {
        KeyCode::Enter => app.submit(),
        KeyCode::Char(c) => app.compose.insert(c),
        KeyCode::Backspace => app.compose.backspace(),
        KeyCode::Delete => app.compose.delete(),
        KeyCode::Left => app.compose.move_left(),
        KeyCode::Right => app.compose.move_right(),
        KeyCode::Home => app.compose.move_home(),
        KeyCode::End => app.compose.move_end(),
        KeyCode::Up => app.log_view.scroll_up(),
        KeyCode::Down => app.log_view.scroll_down(),
        KeyCode::PageUp => app.log_view.page_up(),
        KeyCode::PageDown => app.log_view.page_down(),
        // Jump back to the live tail after reading history
        KeyCode::Esc => app.log_view.scroll_to_bottom(),
        _ => {}
    }
}

/// Handle mouse input - the wheel scrolls the log
fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => app.log_view.scroll_up(),
        MouseEventKind::ScrollDown => app.log_view.scroll_down(),
        _ => {}
    }
}
