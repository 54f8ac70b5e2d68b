pub mod canvas;
pub mod gallery;
pub mod history;
pub mod library;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, View};

/// Tab bar and content area of the screen.
fn screen_layout(screen: Rect) -> [Rect; 2] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(screen);
    [chunks[0], chunks[1]]
}

/// Area left for the current view once the tab bar is drawn.
pub fn content_area(screen: Rect) -> Rect {
    screen_layout(screen)[1]
}

pub fn render(frame: &mut Frame, app: &App) {
    let [tab_area, content] = screen_layout(frame.area());

    tabs::render_tabs(frame, app, tab_area);

    match app.view {
        View::Library => library::render_library(frame, content, app.selected),
        View::Game => match &app.session {
            Some(session) => session.render(frame, content),
            None => library::render_library(frame, content, app.selected),
        },
        View::History => history::render_history(frame, content, app),
        View::Gallery => gallery::render_gallery(frame, content, app.gallery_selected),
    }
}

/// Frame a game screen and split it into status line, play field and help
/// line. `None` when the area is too small to draw a board.
pub fn game_layout(frame: &mut Frame, area: Rect, title: &str, accent: Color) -> Option<[Rect; 3]> {
    if area.width < 12 || area.height < 6 {
        return None;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(title.to_string())
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
    Some([chunks[0], chunks[1], chunks[2]])
}

pub fn separator() -> Span<'static> {
    Span::styled(" │ ", Style::default().fg(Color::DarkGray))
}

/// A `w`×`h` rect centred in `area`, clipped to it.
pub fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// `key description │ key description ...` help line.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, what)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))));
        }
        spans.push(Span::styled(
            format!("{} ", key),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{} ", what), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

pub fn game_over_line(label: &str, score: u32) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" 💀 {} ", label), Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("Score: {} │ ENTER or R to restart, Esc for the vault", score),
            Style::default().fg(Color::Gray),
        ),
    ])
}

pub fn win_line(label: &str, score: u32) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" 🎉 {} ", label), Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("Score: {} │ ENTER to play again", score),
            Style::default().fg(Color::Gray),
        ),
    ])
}
