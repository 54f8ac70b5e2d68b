use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, View};

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.view.tab_index();
    let titles: Vec<Line> = View::tabs()
        .iter()
        .map(|t| {
            let style = if t.tab_index() == current {
                Style::default()
                    .fg(Color::Rgb(30, 58, 138))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(120, 120, 140))
            };
            Line::from(Span::styled(t.title(), style))
        })
        .collect();

    // Where we are inside the library tab
    let location = match (&app.view, &app.session, &app.history_game) {
        (View::Game, Some(session), _) => format!(
            " {} {} · {}{} ",
            session.meta().icon,
            session.meta().title,
            session.kind().label(),
            if session.is_paused() { " ⏸" } else { "" }
        ),
        (View::History, _, Some(game)) => format!(" 📜 {} ", game.title),
        _ => String::new(),
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(74, 222, 128)))
                .border_type(BorderType::Rounded)
                .title(" 🕹 RetroVault 2025 ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(74, 222, 128))
                        .add_modifier(Modifier::BOLD),
                )
                .title(Line::from(location).right_aligned()),
        )
        .select(current)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(74, 222, 128))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
