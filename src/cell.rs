// Copyright (c) 2026 rezky_nightky

use crate::palette::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
}

impl Cell {
    pub fn blank(bg: Rgb) -> Self {
        Self {
            ch: ' ',
            fg: bg,
            bg,
            bold: false,
        }
    }

    pub fn with_char(self, ch: char) -> Self {
        Self { ch, ..self }
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }
}
