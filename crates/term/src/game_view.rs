//! GameView: maps a `GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameState, Piece};
use crate::fb::{FrameBuffer, Glyph, Style};
use crate::types::{Phase, PieceKind, Rgb};

const BLACK: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(30, 30, 40);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Board origin and frame size in terminal cells.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Terminal layout of the well, side panel and overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for the usual terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, game: &GameState, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let board = game.board();
        let well_w = board.width() as u16 * self.cell_w;
        let well_h = board.height() as u16 * self.cell_h;
        let frame = Frame {
            x: viewport.width.saturating_sub(well_w + 2) / 2,
            y: viewport.height.saturating_sub(well_h + 2) / 2,
            w: well_w + 2,
            h: well_h + 2,
        };

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            well_w,
            well_h,
            Glyph::new(' ', Style::new(WELL_BG, WELL_BG)),
        );
        draw_border(fb, frame, Style::new(Rgb::new(200, 200, 200), BLACK));

        for (y, row) in board.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let glyph = match cell {
                    Some(kind) => block_glyph(*kind),
                    None => Glyph::new('·', Style::new(Rgb::new(90, 90, 100), WELL_BG).dim()),
                };
                self.fill_cell(fb, frame, x as i8, y as i8, glyph);
            }
        }

        if let Some(piece) = game.current_piece() {
            let glyph = block_glyph(piece.kind);
            for (x, y) in piece.cells() {
                // Rows above the well stay hidden.
                if y >= 0 && !board.is_out_of_bounds(x, y) {
                    self.fill_cell(fb, frame, x, y, glyph);
                }
            }
        }

        self.draw_side_panel(fb, game, viewport, frame);

        match game.phase() {
            Phase::Paused => draw_overlay(fb, frame, &["PAUSED", "p to resume"]),
            Phase::GameOver => {
                let score = format!("score {}", game.score());
                draw_overlay(fb, frame, &["GAME OVER", &score, "n for new game"]);
            }
            Phase::Ready => draw_overlay(fb, frame, &["n to start"]),
            Phase::Running => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, game: &GameState, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, glyph: Glyph) {
        if x < 0 || y < 0 {
            return;
        }
        let px = frame.x + 1 + x as u16 * self.cell_w;
        let py = frame.y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, glyph);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, game: &GameState, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x.saturating_add(12) > viewport.width {
            return;
        }

        let label = Style::default().bold();
        let value = Style::new(Rgb::new(200, 200, 200), BLACK);

        let mut y = frame.y;
        for (name, n) in [
            ("SCORE", game.score()),
            ("LEVEL", game.level()),
            ("LINES", game.lines()),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = game.next_piece() {
            self.draw_preview(fb, next, panel_x, y);
        }
        y = y.saturating_add(5);

        let help = Style::new(Rgb::new(140, 140, 140), BLACK).dim();
        for line in ["←→ move  ↑ rotate", "↓ drop  ␣ hard drop", "p pause  n new", "q quit"] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y = y.saturating_add(1);
        }
    }

    fn draw_preview(&self, fb: &mut FrameBuffer, piece: &Piece, x: u16, y: u16) {
        let glyph = block_glyph(piece.kind);
        for (dx, dy) in piece.shape.cells() {
            let px = x + dx as u16 * self.cell_w;
            let py = y + dy as u16 * self.cell_h;
            fb.fill_rect(px, py, self.cell_w, self.cell_h, glyph);
        }
    }
}

fn block_glyph(kind: PieceKind) -> Glyph {
    Glyph::new('█', Style::new(kind.color(), WELL_BG).bold())
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: Style) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.set(x, y, Glyph::new('┌', style));
    fb.set(x + w - 1, y, Glyph::new('┐', style));
    fb.set(x, y + h - 1, Glyph::new('└', style));
    fb.set(x + w - 1, y + h - 1, Glyph::new('┘', style));

    for dx in 1..w - 1 {
        fb.set(x + dx, y, Glyph::new('─', style));
        fb.set(x + dx, y + h - 1, Glyph::new('─', style));
    }
    for dy in 1..h - 1 {
        fb.set(x, y + dy, Glyph::new('│', style));
        fb.set(x + w - 1, y + dy, Glyph::new('│', style));
    }
}

/// Centered lines over the middle of the well
fn draw_overlay(fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
    let style = Style::new(Rgb::new(255, 255, 255), BLACK).bold();
    let top = (frame.y + frame.h / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, text) in lines.iter().enumerate() {
        let text_w = text.chars().count() as u16;
        let x = frame.x + frame.w.saturating_sub(text_w) / 2;
        fb.put_str(x, top + i as u16, text, style);
    }
}
