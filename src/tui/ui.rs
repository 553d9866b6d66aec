// Rendering - lays out the log surface, the compose line, and the status bar

use crate::logging::LogLevel;
use crate::tui::app::{App, OUTGOING_CHANNEL};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let [log_area, compose_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(f.area());

    draw_log(f, log_area, app);
    draw_compose(f, compose_area, app);
    draw_status(f, status_area, app);
}

/// The chat log. Syncs the view's viewport with the layout before reading
/// the visible window, so appends between frames measure live geometry.
fn draw_log(f: &mut Frame, area: Rect, app: &mut App) {
    let inner_height = area.height.saturating_sub(2) as usize;
    app.log_view.set_viewport(inner_height);

    // Flag the title while the user is parked in history
    let title = if app.log_view.at_bottomish() {
        format!(" {OUTGOING_CHANNEL} ")
    } else {
        format!(" {OUTGOING_CHANNEL} [{} below] ", app.log_view.lines_below())
    };

    let lines: Vec<Line> = app.log_view.visible_lines().map(Line::from).collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title),
    );

    f.render_widget(paragraph, area);
}

fn draw_compose(f: &mut Frame, area: Rect, app: &App) {
    let paragraph = Paragraph::new(app.compose.value()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" compose "),
    );
    f.render_widget(paragraph, area);

    // Terminal cursor sits at the edit position inside the border
    let max_column = area.width.saturating_sub(2);
    let column = app.compose.cursor_column().min(max_column);
    f.set_cursor_position(Position::new(area.x + 1 + column, area.y + 1));
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (state, state_style) = if app.is_demo() {
        ("demo", Style::default().fg(Color::Yellow))
    } else if app.connected {
        ("online", Style::default().fg(Color::Green))
    } else {
        ("offline", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    };

    let mut spans = vec![
        Span::styled(format!(" {state} "), state_style),
        Span::styled(
            format!("{} ", app.endpoint),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" Enter:send  ↑/↓:scroll  Esc:live  Ctrl-C:quit "),
    ];

    // Surface the most recent system log entry so warnings are not
    // invisible while the TUI owns the screen
    if let Some(entry) = app.log_buffer.latest() {
        let style = match entry.level {
            LogLevel::Error => Style::default().fg(Color::Red),
            LogLevel::Warn => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::DarkGray),
        };
        spans.push(Span::styled(
            format!(
                " [{}] {:5} {}",
                entry.timestamp.format("%H:%M:%S"),
                entry.level.as_str(),
                entry.message
            ),
            style,
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
