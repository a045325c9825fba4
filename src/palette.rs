// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::glyph::ColorTag;
use crate::runtime::{ColorMode, ColorScheme};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    /// Mixes `self` toward `other`; `t = 0` keeps `self`, `t = 1` gives `other`.
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub base: Rgb,
    pub dim: Rgb,
    pub highlight: Rgb,
}

impl Theme {
    pub fn color(&self, tag: ColorTag) -> Rgb {
        match tag {
            ColorTag::Base => self.base,
            ColorTag::Dim => self.dim,
            ColorTag::Highlight => self.highlight,
        }
    }
}

pub fn theme(scheme: ColorScheme) -> Theme {
    let (base, dim, highlight) = match scheme {
        ColorScheme::Green => (0x43c728, 0x54d13c, 0xcefbe4),
        ColorScheme::Emerald => (0x1f9d55, 0x2f7d4a, 0xb8ffd9),
        ColorScheme::Gold => (0xc9a227, 0x8f7319, 0xfff2c2),
        ColorScheme::Amber => (0xffb000, 0xb37b00, 0xffe7b0),
        ColorScheme::Red => (0xc8102e, 0x7a0a1c, 0xffc9d2),
        ColorScheme::Blue => (0x2d6cdf, 0x1b3f8a, 0xc8dcff),
        ColorScheme::Cyan => (0x1fb5c9, 0x13707d, 0xd2fbff),
        ColorScheme::Purple => (0x8e4fd6, 0x56308a, 0xe9d6ff),
        ColorScheme::Gray => (0x9a9a9a, 0x5c5c5c, 0xf2f2f2),
    };

    Theme {
        background: Rgb::hex(0x000000),
        base: Rgb::hex(base),
        dim: Rgb::hex(dim),
        highlight: Rgb::hex(highlight),
    }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let Rgb { r, g, b } = c;

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(
        r,
        g,
        b,
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, level) = if avg < 8 {
        (16, 0)
    } else if avg > 238 {
        (231, 255)
    } else {
        let i = (avg - 8) / 10;
        (232 + i, 8 + 10 * i)
    };
    let gray_dist = dist2(r, g, b, level, level, level);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (color, (r, g, b)) in TABLE {
        let d = dist2(c.r, c.g, c.b, r, g, b);
        if d < best_d {
            best_d = d;
            best = color;
        }
    }
    best
}

/// Terminal color for `c`; `None` means the terminal's default.
pub fn to_terminal_color(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::Color16 => Some(rgb_to_color16(c)),
    }
}
