/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next screen into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous screen)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout: status line, a blank row, the board, a blank row, help.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::sim::session::Hud;
use crate::ui::frame::{Frame, Paint};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so the gaps
    /// between rows match the cells on terminals that paint them separately.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel cell used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

/// Colours for each class of board cell: (foreground, background).
fn paint_colors(paint: Paint) -> (Color, Color) {
    match paint {
        Paint::Blank     => (Color::White, Color::Reset),
        Paint::Wall      => (Color::Rgb { r: 150, g: 150, b: 150 }, Color::Rgb { r: 70, g: 70, b: 70 }),
        Paint::Water     => (Color::Rgb { r: 90, g: 160, b: 255 }, Color::Rgb { r: 10, g: 30, b: 80 }),
        Paint::Fire      => (Color::Rgb { r: 255, g: 140, b: 30 }, Color::Rgb { r: 90, g: 20, b: 0 }),
        Paint::Banner    => (Color::Rgb { r: 255, g: 220, b: 80 }, Color::Reset),
        Paint::Companion => (Color::Rgb { r: 255, g: 150, b: 200 }, Color::Reset),
        Paint::Follower  => (Color::Rgb { r: 255, g: 190, b: 220 }, Color::Reset),
        Paint::Key       => (Color::Rgb { r: 255, g: 215, b: 0 }, Color::Reset),
        Paint::Door      => (Color::Rgb { r: 180, g: 120, b: 60 }, Color::Rgb { r: 100, g: 65, b: 30 }),
        Paint::Exit      => (Color::Rgb { r: 80, g: 255, b: 120 }, Color::Reset),
        Paint::Player    => (Color::Rgb { r: 100, g: 220, b: 255 }, Color::Reset),
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y) with given colors. Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Renderer ──

/// Vertical offsets
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const HELP: &str = " w/a/s/d, arrows: move   n: skip level   Esc: quit";

pub struct Renderer<W: Write = BufWriter<Stdout>> {
    writer: W,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer::with_writer(BufWriter::with_capacity(16384, io::stdout()))
    }
}

impl<W: Write> Renderer<W> {
    fn with_writer(writer: W) -> Self {
        Renderer {
            writer,
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.set_size(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Draw one frame plus the status line.
    pub fn present(&mut self, frame: &Frame, hud: &Hud) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.set_size(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.compose(frame, hud);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn set_size(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, frame: &Frame, hud: &Hud) {
        self.front.clear();
        let buf_w = self.front.width;

        // ── Status line ──
        let keys: String = if hud.keys.is_empty() {
            "-".into()
        } else {
            hud.keys.iter().collect()
        };
        let status = format!(
            " LEVEL {}/{}   KEYS {}   FRIENDS {}",
            hud.level, hud.total_levels, keys, hud.companions,
        );
        for x in 0..buf_w {
            self.front.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
        }
        self.front.put_str(0, HUD_ROW, &status, Color::White, HUD_BG);

        // ── Board (clipped to the terminal) ──
        let rows = frame.height.min(self.front.height.saturating_sub(MAP_ROW));
        let cols = frame.width.min(buf_w);
        for r in 0..rows {
            for col in 0..cols {
                let fc = frame.get(r, col);
                let (fg, bg) = paint_colors(fc.paint);
                self.front.set(col, MAP_ROW + r, Cell::new(fc.ch, fg, bg));
            }
        }

        // ── Help bar ──
        let help_row = MAP_ROW + frame.height + 1;
        if help_row < self.front.height {
            self.front.put_str(0, help_row, HELP, Color::DarkGrey, Color::Reset);
        }
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors rather than ResetColor, which would fall back
        // to the terminal's own default background.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                // Position cursor if needed
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                // Set colors only if changed
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}
