use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::LIBRARY_COLUMNS;
use crate::catalog::{GameKind, GameMetadata, RETRO_GAMES};

use super::key_hints;

const TILE_HEIGHT: u16 = 7;

fn accent(kind: GameKind) -> (Color, Color) {
    match kind {
        GameKind::Tetris => (Color::Rgb(100, 180, 255), Color::Rgb(50, 90, 140)),
        GameKind::Snake => (Color::Rgb(80, 220, 80), Color::Rgb(40, 120, 40)),
        GameKind::Arkanoid => (Color::Rgb(220, 80, 80), Color::Rgb(120, 40, 40)),
        GameKind::Pinball => (Color::Rgb(255, 160, 60), Color::Rgb(140, 80, 30)),
        GameKind::Pong => (Color::Rgb(220, 220, 220), Color::Rgb(100, 100, 110)),
        GameKind::Maze => (Color::Rgb(255, 220, 80), Color::Rgb(130, 110, 40)),
        GameKind::Platformer => (Color::Rgb(200, 120, 255), Color::Rgb(100, 60, 140)),
        GameKind::Shooter => (Color::Rgb(80, 255, 200), Color::Rgb(40, 140, 100)),
    }
}

/// First grid row to draw so that `selected` stays on screen.
pub fn first_visible_row(selected: usize, visible_rows: usize) -> usize {
    let row = selected / LIBRARY_COLUMNS;
    let visible_rows = visible_rows.max(1);
    if row < visible_rows {
        0
    } else {
        row + 1 - visible_rows
    }
}

fn render_game_tile(frame: &mut Frame, area: Rect, game: &GameMetadata, selected: bool) {
    let (color, border_color) = accent(game.kind());
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { color };
    let dim = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", game.icon), Style::default()),
            Span::styled(game.title, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            game.category.to_uppercase(),
            Style::default().fg(color).add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(game.description(), Style::default().fg(dim))),
    ];

    if selected {
        lines.push(Line::from(vec![
            Span::styled("▶ PLAY ", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
            Span::styled("· H history", Style::default().fg(Color::Rgb(80, 200, 255))),
        ]));
    }

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(p, inner);
}

pub fn render_library(frame: &mut Frame, area: Rect, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Grid
            Constraint::Length(1), // Help
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                " Retro Classics ",
                Style::default().fg(Color::Rgb(74, 222, 128)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} PLAYABLE GAMES", RETRO_GAMES.len()),
                Style::default().fg(Color::Rgb(100, 100, 120)),
            ),
        ]),
        Line::from(Span::styled(
            " Pick a cartridge and press start.",
            Style::default().fg(Color::Rgb(120, 120, 140)),
        )),
    ]);
    frame.render_widget(header, chunks[0]);

    let grid = chunks[1];
    let visible_rows = (grid.height / TILE_HEIGHT).max(1) as usize;
    let total_rows = RETRO_GAMES.len().div_ceil(LIBRARY_COLUMNS);
    let first = first_visible_row(selected, visible_rows);
    let last = (first + visible_rows).min(total_rows);

    let row_constraints: Vec<Constraint> = (first..last).map(|_| Constraint::Length(TILE_HEIGHT)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(grid);

    for (slot, row) in (first..last).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, LIBRARY_COLUMNS as u32); LIBRARY_COLUMNS])
            .split(rows[slot]);
        for (col, cell) in cols.iter().enumerate() {
            let index = row * LIBRARY_COLUMNS + col;
            if let Some(game) = RETRO_GAMES.get(index) {
                render_game_tile(frame, *cell, game, index == selected);
            }
        }
    }

    if total_rows > visible_rows {
        let mut state = ScrollbarState::new(total_rows).position(selected / LIBRARY_COLUMNS);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            grid,
            &mut state,
        );
    }

    let help = Paragraph::new(key_hints(&[
        ("←↑↓→", "Select"),
        ("Enter", "Play"),
        ("H", "History"),
        ("Tab", "2025 New"),
        ("Q", "Quit"),
    ]));
    frame.render_widget(help, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_rows_need_no_scroll() {
        assert_eq!(first_visible_row(0, 3), 0);
        assert_eq!(first_visible_row(8, 3), 0);
    }

    #[test]
    fn test_scrolls_to_keep_selection_visible() {
        // row 9 with three rows on screen
        assert_eq!(first_visible_row(29, 3), 7);
        assert_eq!(first_visible_row(9, 3), 1);
        assert_eq!(first_visible_row(12, 1), 4);
    }

    #[test]
    fn test_zero_rows_still_shows_selection() {
        assert_eq!(first_visible_row(5, 0), 1);
    }
}
