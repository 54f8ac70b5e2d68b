use ratatui::prelude::*;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A character grid that maps a logical board (in board pixels) onto the
/// terminal cells available for it.
///
/// Each cell holds one grapheme. A double-width grapheme leaves an empty
/// string in the cell it covers so every row keeps its display width.
pub struct Canvas {
    cells: Vec<Vec<(String, Style)>>,
    cols: usize,
    rows: usize,
    sx: f32,
    sy: f32,
    bg: Color,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, board_w: f32, board_h: f32, bg: Color) -> Self {
        Self {
            cells: vec![vec![(" ".to_string(), Style::default().bg(bg)); cols]; rows],
            cols,
            rows,
            sx: cols as f32 / board_w,
            sy: rows as f32 / board_h,
            bg,
        }
    }

    fn cell_of(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let cx = (x * self.sx) as usize;
        let cy = (y * self.sy) as usize;
        (cx < self.cols && cy < self.rows).then_some((cx, cy))
    }

    /// Blank out the other half of a wide glyph that overlaps `cx`.
    fn split_wide(&mut self, cx: usize, cy: usize) {
        let row = &mut self.cells[cy];
        if row[cx].0.is_empty() && cx > 0 {
            row[cx - 1].0 = " ".to_string();
        }
        if row[cx].0.width() > 1 && cx + 1 < row.len() {
            row[cx + 1].0 = " ".to_string();
        }
    }

    fn put_grapheme(&mut self, cx: usize, cy: usize, g: &str, width: usize, fg: Color) {
        if cy >= self.rows || cx + width > self.cols {
            return;
        }
        for i in 0..width {
            self.split_wide(cx + i, cy);
        }
        let style = Style::default().fg(fg).bg(self.bg);
        self.cells[cy][cx] = (g.to_string(), style);
        for i in 1..width {
            self.cells[cy][cx + i] = (String::new(), style);
        }
    }

    fn put(&mut self, cx: usize, cy: usize, ch: char, fg: Color) {
        let mut buf = [0u8; 4];
        let width = ch.width().unwrap_or(1).max(1);
        self.put_grapheme(cx, cy, ch.encode_utf8(&mut buf), width, fg);
    }

    /// Draw one glyph at a board point.
    pub fn plot(&mut self, x: f32, y: f32, ch: char, fg: Color) {
        if let Some((cx, cy)) = self.cell_of(x, y) {
            self.put(cx, cy, ch, fg);
        }
    }

    /// Fill every cell the rectangle overlaps.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, ch: char, fg: Color) {
        let x0 = (x.max(0.0) * self.sx) as usize;
        let y0 = (y.max(0.0) * self.sy) as usize;
        let x1 = (((x + w) * self.sx).ceil().max(0.0) as usize).min(self.cols);
        let y1 = (((y + h) * self.sy).ceil().max(0.0) as usize).min(self.rows);
        for cy in y0..y1 {
            for cx in x0..x1 {
                self.put(cx, cy, ch, fg);
            }
        }
    }

    /// Fill the cells whose centres fall inside the circle, and always the
    /// centre cell so small discs stay visible.
    pub fn disc(&mut self, cx: f32, cy: f32, r: f32, ch: char, fg: Color) {
        let x0 = ((cx - r).max(0.0) * self.sx) as usize;
        let y0 = ((cy - r).max(0.0) * self.sy) as usize;
        let x1 = (((cx + r) * self.sx).ceil().max(0.0) as usize).min(self.cols);
        let y1 = (((cy + r) * self.sy).ceil().max(0.0) as usize).min(self.rows);
        for row in y0..y1 {
            for col in x0..x1 {
                let px = (col as f32 + 0.5) / self.sx;
                let py = (row as f32 + 0.5) / self.sy;
                let (dx, dy) = (px - cx, py - cy);
                if dx * dx + dy * dy <= r * r {
                    self.put(col, row, ch, fg);
                }
            }
        }
        self.plot(cx, cy, ch, fg);
    }

    /// Straight line between two board points.
    pub fn segment(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, ch: char, fg: Color) {
        let cols = ((x2 - x1) * self.sx).abs();
        let rows = ((y2 - y1) * self.sy).abs();
        let steps = cols.max(rows).ceil().max(1.0) as usize;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            self.plot(x1 + (x2 - x1) * t, y1 + (y2 - y1) * t, ch, fg);
        }
    }

    /// Write text starting at a board point, advancing by display width.
    /// Text running past the right edge is cut at the last whole grapheme.
    pub fn text(&mut self, x: f32, y: f32, s: &str, fg: Color) {
        let Some((mut cx, cy)) = self.cell_of(x, y) else {
            return;
        };
        for g in s.graphemes(true) {
            let width = g.width();
            if width == 0 {
                continue;
            }
            if cx + width > self.cols {
                break;
            }
            self.put_grapheme(cx, cy, g, width, fg);
            cx += width;
        }
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.cells
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(g, style)| Span::styled(g, style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
