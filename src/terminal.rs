// Copyright (c) 2026 rezky_nightky

use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor, event,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;
use crate::palette::{to_terminal_color, Rgb};
use crate::runtime::ColorMode;

/// Foreground, background, bold.
type Style = (Color, Color, bool);

/// Attributes already sent to the terminal during one draw, so repeated
/// colors and contiguous runs cost nothing extra.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    cursor: Option<(u16, u16)>,
}

impl Pen {
    fn put<W: Write>(
        &mut self,
        out: &mut W,
        x: u16,
        y: u16,
        ch: char,
        style: Style,
    ) -> io::Result<()> {
        let (fg, bg, bold) = style;
        if self.cursor != Some((x, y)) {
            out.queue(cursor::MoveTo(x, y))?;
        }
        if self.fg != Some(fg) {
            out.queue(SetForegroundColor(fg))?;
            self.fg = Some(fg);
        }
        if self.bg != Some(bg) {
            out.queue(SetBackgroundColor(bg))?;
            self.bg = Some(bg);
        }
        if self.bold != bold {
            let attr = if bold { Attribute::Bold } else { Attribute::NormalIntensity };
            out.queue(SetAttribute(attr))?;
            self.bold = bold;
        }
        out.queue(Print(ch))?;
        self.cursor = x.checked_add(1).map(|nx| (nx, y));
        Ok(())
    }
}

/// What is currently on screen.
struct Shown {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Shown {
    fn matches(&self, frame: &Frame) -> bool {
        self.width == frame.width && self.height == frame.height
    }
}

/// Presents [`Frame`]s on the real terminal. Owns raw mode and the alternate
/// screen for as long as it lives.
pub struct Terminal {
    out: Stdout,
    shown: Option<Shown>,
    color_mode: ColorMode,
    default_background: bool,
}

impl Terminal {
    pub fn new(color_mode: ColorMode, default_background: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = enter_screen(&mut out) {
            restore_terminal_best_effort();
            return Err(e);
        }
        Ok(Self {
            out,
            shown: None,
            color_mode,
            default_background,
        })
    }

    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> io::Result<event::Event> {
        event::read()
    }

    fn style(&self, cell: &Cell) -> Style {
        let fg = to_terminal_color(cell.fg, self.color_mode).unwrap_or(Color::Reset);
        let bg = if self.default_background {
            Color::Reset
        } else {
            to_terminal_color(cell.bg, self.color_mode).unwrap_or(Color::Reset)
        };
        (fg, bg, cell.bold)
    }

    /// Emits the cells of `frame` that differ from what is on screen. A size
    /// change clears the screen and repaints everything.
    pub fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let mut shown = match self.shown.take() {
            Some(s) if s.matches(frame) => s,
            _ => {
                self.out.queue(terminal::Clear(terminal::ClearType::All))?;
                // never equal to a painted cell, forcing a full repaint
                let unset = Cell::blank(Rgb::hex(0x000000)).with_char('\0');
                Shown {
                    width: frame.width,
                    height: frame.height,
                    cells: vec![unset; frame.width as usize * frame.height as usize],
                }
            }
        };

        let mut pen = Pen::default();
        let width = frame.width as usize;
        for (i, seen) in shown.cells.iter_mut().enumerate() {
            let cell = frame.cell_at_index(i);
            if *seen == cell {
                continue;
            }
            *seen = cell;
            let (x, y) = ((i % width) as u16, (i / width) as u16);
            let style = self.style(&cell);
            pen.put(&mut self.out, x, y, cell.ch, style)?;
        }

        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        self.out.flush()?;
        self.shown = Some(shown);
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore_terminal_best_effort();
    }
}

fn enter_screen(out: &mut Stdout) -> io::Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    let _ = out.execute(terminal::DisableLineWrap);
    out.execute(SetAttribute(Attribute::Reset))?;
    out.execute(ResetColor)?;
    out.execute(terminal::Clear(terminal::ClearType::All))?;
    out.flush()
}

/// Log sink for when no log file is given: stderr, except while raw mode is
/// on, where anything written would land on top of the rain.
pub fn stderr_outside_raw_mode() -> Box<dyn Write> {
    if terminal::is_raw_mode_enabled().unwrap_or(false) {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    }
}

/// Undoes everything [`Terminal::new`] set up. Safe to call more than once
/// and from a panic hook.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_skips_redundant_commands() {
        let mut buf: Vec<u8> = Vec::new();
        let mut pen = Pen::default();
        let style = (Color::Green, Color::Black, false);
        pen.put(&mut buf, 0, 0, 'a', style).unwrap();
        let first = buf.len();
        pen.put(&mut buf, 1, 0, 'b', style).unwrap();
        // contiguous and same style: only the character itself
        assert_eq!(buf.len(), first + 1);
        assert_eq!(buf.last(), Some(&b'b'));
    }

    #[test]
    fn log_writer_accepts_lines_in_cooked_mode() {
        // tests never enable raw mode
        let mut w = stderr_outside_raw_mode();
        assert!(w.write_all(b"").is_ok());
        assert!(w.flush().is_ok());
    }

    #[test]
    fn pen_moves_cursor_on_jumps() {
        let mut buf: Vec<u8> = Vec::new();
        let mut pen = Pen::default();
        let style = (Color::Green, Color::Black, true);
        pen.put(&mut buf, 0, 0, 'a', style).unwrap();
        let first = buf.len();
        pen.put(&mut buf, 5, 3, 'b', style).unwrap();
        assert!(buf.len() > first + 1);
        assert_eq!(pen.cursor, Some((6, 3)));
    }
}
