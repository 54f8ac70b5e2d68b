use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::catalog::{LatestGame, LATEST_GAMES_2025};

use super::key_hints;

const CARD_ACCENTS: [Color; 4] = [
    Color::Rgb(255, 80, 200),
    Color::Rgb(120, 200, 255),
    Color::Rgb(255, 160, 60),
    Color::Rgb(160, 120, 255),
];

fn render_card(frame: &mut Frame, area: Rect, game: &LatestGame, accent: Color, selected: bool) {
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let border_color = if selected { accent } else { Color::Rgb(60, 60, 80) };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color))
        .title(Line::from(Span::styled(
            format!(" {} ", game.release_date),
            Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD),
        )))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let title_color = if selected { Color::White } else { accent };
    let lines = vec![
        Line::from(Span::styled(
            game.title,
            Style::default().fg(title_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(game.description, Style::default().fg(Color::Rgb(160, 160, 180)))),
        Line::from(""),
        Line::from(vec![
            Span::styled("★★★★★ ", Style::default().fg(Color::Rgb(255, 220, 80))),
            Span::styled("Most anticipated", Style::default().fg(Color::Rgb(100, 100, 120))),
        ]),
        Line::from(Span::styled(
            game.image,
            Style::default().fg(Color::Rgb(80, 120, 160)).add_modifier(Modifier::UNDERLINED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

pub fn render_gallery(frame: &mut Frame, area: Rect, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Cards
            Constraint::Length(1), // Help
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            " The 2025 Collection",
            Style::default().fg(Color::Rgb(255, 80, 200)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            " The most anticipated releases of the year.",
            Style::default().fg(Color::Rgb(100, 100, 120)),
        )),
    ]);
    frame.render_widget(header, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(chunks[1]);

    for (i, game) in LATEST_GAMES_2025.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(rows[i / 2]);
        let accent = CARD_ACCENTS[i % CARD_ACCENTS.len()];
        render_card(frame, cols[i % 2], game, accent, i == selected);
    }

    let help = Paragraph::new(key_hints(&[
        ("←↑↓→", "Browse"),
        ("Tab", "Library"),
        ("Esc", "Back"),
    ]));
    frame.render_widget(help, chunks[2]);
}
