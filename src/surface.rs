// Copyright (c) 2026 rezky_nightky

use crate::palette::Rgb;

/// Size of a drawing surface in surface units (pixels, or the cell-scaled
/// equivalent on a terminal).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

/// Immediate-mode 2D drawing context. Fill, alpha and glow are sticky state
/// applied to every following `fill_text`.
pub trait Canvas2d {
    /// Paints the whole surface opaque with `background`.
    fn clear(&mut self, background: Rgb);
    fn set_fill(&mut self, color: Rgb);
    fn set_alpha(&mut self, alpha: f32);
    fn set_glow(&mut self, glow: bool);
    /// Draws `ch` with its top edge at `y`.
    fn fill_text(&mut self, ch: char, x: f32, y: f32);
}

pub trait Surface {
    fn dimensions(&self) -> Dimensions;

    /// The 2D context, or `None` when the surface cannot provide one.
    fn canvas(&mut self) -> Option<&mut dyn Canvas2d>;
}
