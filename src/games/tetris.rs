use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::Game;
use crate::input::{Action, Controls};
use crate::ui;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
const DROP_INTERVAL: Duration = Duration::from_millis(800);
const SPAWN_X: i32 = 3;
const SPAWN_Y: i32 = 0;
const LINE_POINTS: u32 = 100;

const SHAPES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],           // I
    &[&[1, 1], &[1, 1]],        // O
    &[&[0, 1, 0], &[1, 1, 1]],  // T
    &[&[1, 0, 0], &[1, 1, 1]],  // L
    &[&[0, 0, 1], &[1, 1, 1]],  // J
    &[&[1, 1, 0], &[0, 1, 1]],  // S
    &[&[0, 1, 1], &[1, 1, 0]],  // Z
];

const COLORS: [Color; 7] = [
    Color::Rgb(59, 130, 246),
    Color::Rgb(239, 68, 68),
    Color::Rgb(16, 185, 129),
    Color::Rgb(245, 158, 11),
    Color::Rgb(139, 92, 246),
    Color::Rgb(236, 72, 153),
    Color::Rgb(6, 182, 212),
];

/// Settled cells hold the colour index of the piece that filled them.
pub type Board = [[Option<usize>; COLS]; ROWS];

#[derive(Debug, Clone)]
struct Piece {
    cells: Vec<Vec<bool>>,
    color: usize,
    x: i32,
    y: i32,
}

impl Piece {
    fn spawn(kind: usize) -> Self {
        Self {
            cells: SHAPES[kind]
                .iter()
                .map(|row| row.iter().map(|&c| c != 0).collect())
                .collect(),
            color: kind,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    /// Board coordinates of every occupied sub-cell at offset `(x, y)`.
    fn blocks_at(&self, x: i32, y: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(c, _)| (x + c as i32, y + r as i32))
        })
    }

    fn rotated_clockwise(&self) -> Vec<Vec<bool>> {
        let rows = self.cells.len();
        let cols = self.cells[0].len();
        (0..cols)
            .map(|c| (0..rows).rev().map(|r| self.cells[r][c]).collect())
            .collect()
    }
}

/// Remove every full row, shift the rows above down and refill the top with
/// empty rows. Returns how many rows were removed.
pub fn clear_full_rows(board: &mut Board) -> usize {
    let kept: Vec<[Option<usize>; COLS]> = board
        .iter()
        .filter(|row| row.iter().any(|cell| cell.is_none()))
        .copied()
        .collect();
    let cleared = ROWS - kept.len();
    if cleared > 0 {
        let mut next: Board = [[None; COLS]; ROWS];
        next[cleared..].copy_from_slice(&kept);
        *board = next;
    }
    cleared
}

pub struct Tetris {
    board: Board,
    piece: Piece,
    score: u32,
    lines: u32,
    game_over: bool,
    rng: StdRng,
}

impl Tetris {
    pub fn new(seed: u64) -> Self {
        Self {
            board: [[None; COLS]; ROWS],
            piece: Piece::spawn(0),
            score: 0,
            lines: 0,
            game_over: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn collides(&self, cells: &Piece, x: i32, y: i32) -> bool {
        cells.blocks_at(x, y).any(|(bx, by)| {
            if bx < 0 || bx >= COLS as i32 || by >= ROWS as i32 {
                return true;
            }
            by >= 0 && self.board[by as usize][bx as usize].is_some()
        })
    }

    fn shift(&mut self, dx: i32) {
        let nx = self.piece.x + dx;
        if !self.collides(&self.piece, nx, self.piece.y) {
            self.piece.x = nx;
        }
    }

    fn rotate(&mut self) {
        let mut turned = self.piece.clone();
        turned.cells = self.piece.rotated_clockwise();
        if !self.collides(&turned, turned.x, turned.y) {
            self.piece = turned;
        }
    }

    /// Drop one row, locking the piece when it cannot move. Returns whether
    /// the piece locked.
    fn drop_one(&mut self) -> bool {
        let ny = self.piece.y + 1;
        if !self.collides(&self.piece, self.piece.x, ny) {
            self.piece.y = ny;
            return false;
        }
        self.lock();
        true
    }

    fn hard_drop(&mut self) {
        while !self.game_over && !self.drop_one() {}
    }

    fn lock(&mut self) {
        let color = self.piece.color;
        let blocks: Vec<(i32, i32)> = self.piece.blocks_at(self.piece.x, self.piece.y).collect();
        for (bx, by) in blocks {
            if by >= 0 {
                self.board[by as usize][bx as usize] = Some(color);
            }
        }

        let cleared = clear_full_rows(&mut self.board) as u32;
        self.lines += cleared;
        self.score += cleared * LINE_POINTS;

        let next = self.rng.gen_range(0..SHAPES.len());
        self.piece = Piece::spawn(next);
        if self.collides(&self.piece, SPAWN_X, SPAWN_Y) {
            self.game_over = true;
            log::info!("Tetris stack topped out, score {}", self.score);
        }
    }

    fn render_board(&self) -> Vec<Line<'static>> {
        let bg = Color::Rgb(245, 245, 250);
        let mut display: Vec<Vec<Option<usize>>> = self.board.iter().map(|row| row.to_vec()).collect();
        if !self.game_over {
            for (bx, by) in self.piece.blocks_at(self.piece.x, self.piece.y) {
                if by >= 0 && (by as usize) < ROWS && bx >= 0 && (bx as usize) < COLS {
                    display[by as usize][bx as usize] = Some(self.piece.color);
                }
            }
        }

        display
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|cell| match cell {
                        Some(c) => Span::styled("██", Style::default().fg(COLORS[c]).bg(bg)),
                        None => Span::styled("· ", Style::default().fg(Color::Rgb(200, 200, 210)).bg(bg)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Game for Tetris {
    fn tick_interval(&self) -> Duration {
        DROP_INTERVAL
    }

    fn step(&mut self, _controls: &Controls) {
        if self.game_over {
            return;
        }
        self.drop_one();
    }

    fn press(&mut self, action: Action) {
        if self.game_over {
            return;
        }
        match action {
            Action::Left => self.shift(-1),
            Action::Right => self.shift(1),
            Action::Up => self.rotate(),
            Action::Down => {
                self.drop_one();
            }
            Action::Fire => self.hard_drop(),
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some([status, field, help]) = ui::game_layout(frame, area, " 🧩 Tetris ", Color::Rgb(59, 130, 246)) else {
            return;
        };

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Score: {} ", self.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                ui::separator(),
                Span::styled(format!("Lines: {} ", self.lines), Style::default().fg(Color::Cyan)),
            ])),
            status,
        );

        let board = ui::centered(field, COLS as u16 * 2, ROWS as u16);
        frame.render_widget(Paragraph::new(self.render_board()), board);

        let footer = if self.game_over {
            ui::game_over_line("GAME OVER", self.score)
        } else {
            ui::key_hints(&[("←→", "Move"), ("↑", "Rotate"), ("↓", "Drop"), ("Space", "Slam"), ("P", "Pause"), ("R", "Restart")])
        };
        frame.render_widget(Paragraph::new(footer), help);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Tetris::new(seed);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HoldMode;
    use proptest::prelude::*;

    fn controls() -> Controls {
        Controls::new(HoldMode::UntilRelease)
    }

    fn full_row() -> [Option<usize>; COLS] {
        [Some(1); COLS]
    }

    #[test]
    fn test_only_full_rows_clear() {
        let mut board: Board = [[None; COLS]; ROWS];
        board[ROWS - 1] = full_row();
        board[ROWS - 2] = full_row();
        board[ROWS - 2][4] = None;
        board[ROWS - 3][0] = Some(2);

        assert_eq!(clear_full_rows(&mut board), 1);
        // the partial row moved down into the cleared slot
        assert_eq!(board[ROWS - 1][4], None);
        assert_eq!(board[ROWS - 1][0], Some(1));
        assert_eq!(board[ROWS - 2][0], Some(2));
        assert_eq!(board.len(), ROWS);
    }

    #[test]
    fn test_clearing_scores_per_row() {
        let mut t = Tetris::new(7);
        // Bottom row full except columns 3..7, which the flat I piece fills.
        t.board[ROWS - 1] = full_row();
        for c in 3..7 {
            t.board[ROWS - 1][c] = None;
        }
        t.board[ROWS - 2][0] = Some(4);

        t.hard_drop();
        assert_eq!(t.lines, 1);
        assert_eq!(t.score(), LINE_POINTS);
        // the row above shifted down
        assert_eq!(t.board[ROWS - 1][0], Some(4));
    }

    #[test]
    fn test_two_rows_at_once() {
        let mut t = Tetris::new(8);
        // O piece at x=3 fills columns 3 and 4 of the bottom two rows.
        t.piece = Piece::spawn(1);
        for r in [ROWS - 1, ROWS - 2] {
            t.board[r] = full_row();
            t.board[r][3] = None;
            t.board[r][4] = None;
        }
        t.hard_drop();
        assert_eq!(t.score(), 2 * LINE_POINTS);
        assert!(t.board[ROWS - 1].iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_walls_block_shift() {
        let mut t = Tetris::new(9);
        for _ in 0..10 {
            t.press(Action::Left);
        }
        assert_eq!(t.piece.x, 0);
        for _ in 0..10 {
            t.press(Action::Right);
        }
        assert_eq!(t.piece.x, COLS as i32 - 4);
    }

    #[test]
    fn test_rotation_rejected_when_blocked() {
        let mut t = Tetris::new(10);
        // Vertical I at x=3 would need rows 0..4 of column 3.
        t.board[2][3] = Some(5);
        t.press(Action::Up);
        assert_eq!(t.piece.cells.len(), 1);

        t.board[2][3] = None;
        t.press(Action::Up);
        assert_eq!(t.piece.cells.len(), 4);
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut t = Tetris::new(11);
        for c in 0..COLS {
            if c != 9 {
                t.board[1][c] = Some(3);
            }
        }
        t.step(&controls());
        assert!(t.is_game_over());

        let board = t.board;
        let score = t.score();
        t.step(&controls());
        t.press(Action::Fire);
        assert_eq!(t.board, board);
        assert_eq!(t.score(), score);
    }

    #[test]
    fn test_timer_drop_moves_one_row() {
        let mut t = Tetris::new(12);
        t.step(&controls());
        assert_eq!(t.piece.y, 1);
    }

    proptest! {
        #[test]
        fn row_cleared_iff_full(rows in prop::collection::vec(prop::collection::vec(any::<bool>(), COLS), ROWS)) {
            let mut board: Board = [[None; COLS]; ROWS];
            for (r, row) in rows.iter().enumerate() {
                for (c, &filled) in row.iter().enumerate() {
                    if filled {
                        board[r][c] = Some(0);
                    }
                }
            }
            let full = rows.iter().filter(|row| row.iter().all(|&f| f)).count();
            let partial: Vec<[Option<usize>; COLS]> = board
                .iter()
                .filter(|row| row.iter().any(|c| c.is_none()))
                .copied()
                .collect();

            let cleared = clear_full_rows(&mut board);
            prop_assert_eq!(cleared, full);
            prop_assert_eq!(board.len(), ROWS);
            prop_assert!(board[..cleared].iter().all(|row| row.iter().all(|c| c.is_none())));
            prop_assert_eq!(&board[cleared..], &partial[..]);
        }
    }
}
