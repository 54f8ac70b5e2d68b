use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::trivia::TriviaState;

use super::key_hints;

const PARCHMENT: Color = Color::Rgb(230, 220, 190);
const GOLD: Color = Color::Rgb(255, 220, 80);

/// Header, body and help line.
fn sections(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Help
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn body_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(140, 110, 60)))
        .title(" History & Fun Facts ")
        .title_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .padding(Padding::horizontal(1))
}

fn body_text(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(PARCHMENT))
        .wrap(Wrap { trim: false })
}

/// Furthest the trivia text can scroll in a history view drawn into `area`
/// before its last line leaves the bottom of the body.
pub fn max_scroll(area: Rect, text: &str) -> u16 {
    let [_, body, _] = sections(area);
    let inner = body_block().inner(body);
    let lines = body_text(text).line_count(inner.width);
    u16::try_from(lines)
        .unwrap_or(u16::MAX)
        .saturating_sub(inner.height)
}

fn loading_lines(title: &str) -> Vec<Line<'static>> {
    let bar = |width: usize| {
        Line::from(Span::styled(
            "░".repeat(width),
            Style::default().fg(Color::Rgb(60, 60, 80)),
        ))
    };
    vec![
        Line::from(Span::styled(
            format!("Consulting the archives about {}...", title),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        bar(48),
        bar(56),
        bar(40),
        Line::from(""),
        bar(52),
        bar(36),
    ]
}

pub fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let [header_area, body_area, help_area] = sections(area);

    let (icon, title) = match &app.history_game {
        Some(game) => (game.icon, game.title),
        None => ("📜", "Unknown"),
    };

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default()),
            Span::styled(title, Style::default().fg(GOLD).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(
            " Gaming Encyclopedia",
            Style::default().fg(Color::Rgb(100, 100, 120)),
        )),
    ]);
    frame.render_widget(header, header_area);

    let body = match app.trivia.state() {
        TriviaState::Loading { title } => Paragraph::new(loading_lines(title)),
        TriviaState::Ready { text, .. } => body_text(text).scroll((app.history_scroll, 0)),
        TriviaState::Idle => Paragraph::new(Span::styled(
            "Press R to look this title up.",
            Style::default().fg(Color::Rgb(120, 120, 140)),
        )),
    };
    frame.render_widget(body.block(body_block()), body_area);

    let mut hints = vec![("↑↓", "Scroll")];
    if !app.trivia.is_loading() {
        hints.push(("R", "Retry"));
    }
    hints.push(("Enter", "Play"));
    hints.push(("Esc", "Back"));
    frame.render_widget(Paragraph::new(key_hints(&hints)), help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_does_not_scroll() {
        assert_eq!(max_scroll(Rect::new(0, 0, 80, 21), "A short answer."), 0);
    }

    #[test]
    fn test_long_text_scrolls_to_its_last_line() {
        let text = (1..=40).map(|i| format!("Fact {i}")).collect::<Vec<_>>().join("\n");
        // 21 rows: 3 header, 1 help, 2 border leaves 15 visible lines
        assert_eq!(max_scroll(Rect::new(0, 0, 80, 21), &text), 25);
    }

    #[test]
    fn test_narrow_view_wraps_into_more_lines() {
        let text = "word ".repeat(100);
        let wide = max_scroll(Rect::new(0, 0, 120, 21), &text);
        let narrow = max_scroll(Rect::new(0, 0, 30, 21), &text);
        assert!(narrow > wide);
    }

    #[test]
    fn test_empty_area_never_scrolls() {
        assert_eq!(max_scroll(Rect::default(), "line\n".repeat(50).as_str()), 0);
    }
}
