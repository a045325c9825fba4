// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::palette::Rgb;
use crate::surface::{Canvas2d, Dimensions, Surface};

/// Terminal cell grid used as the rain's drawing surface. Every cell spans
/// `cell_size` surface units in both directions.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cell_size: f32,
    cells: Vec<Cell>,
    background: Rgb,
    fill: Rgb,
    alpha: f32,
    glow: bool,
}

impl Frame {
    pub fn new(width: u16, height: u16, cell_size: f32) -> Self {
        let background = Rgb::hex(0x000000);
        Self {
            width,
            height,
            cell_size,
            cells: vec![Cell::blank(background); width as usize * height as usize],
            background,
            fill: Rgb::hex(0xffffff),
            alpha: 1.0,
            glow: false,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells
            .resize(width as usize * height as usize, Cell::blank(self.background));
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells
            .get(i)
            .copied()
            .unwrap_or(Cell::blank(self.background))
    }

    fn cell_for(&self, x: f32, y: f32) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() || self.cell_size <= 0.0 {
            return None;
        }
        let col = (x / self.cell_size).floor();
        let row = (y / self.cell_size).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        if col >= self.width as f32 || row >= self.height as f32 {
            return None;
        }
        self.index(col as u16, row as u16)
    }
}

impl Surface for Frame {
    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width as f32 * self.cell_size,
            height: self.height as f32 * self.cell_size,
        }
    }

    /// A collapsed grid still has a canvas; drawing on it just lands nowhere.
    fn canvas(&mut self) -> Option<&mut dyn Canvas2d> {
        if self.cell_size <= 0.0 {
            return None;
        }
        Some(self as &mut dyn Canvas2d)
    }
}

impl Canvas2d for Frame {
    fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.cells.fill(Cell::blank(background));
    }

    fn set_fill(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_glow(&mut self, glow: bool) {
        self.glow = glow;
    }

    fn fill_text(&mut self, ch: char, x: f32, y: f32) {
        if self.alpha <= 0.0 {
            return;
        }
        let Some(i) = self.cell_for(x, y) else {
            return;
        };
        self.cells[i] = Cell {
            ch,
            fg: self.background.mix(self.fill, self.alpha),
            bg: self.background,
            bold: self.glow,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_scale_cells_by_cell_size() {
        let f = Frame::new(80, 24, 24.0);
        assert_eq!(
            f.dimensions(),
            Dimensions {
                width: 1920.0,
                height: 576.0
            }
        );
    }

    #[test]
    fn zero_area_frame_keeps_a_canvas() {
        let mut f = Frame::new(0, 10, 24.0);
        let canvas = f.canvas().unwrap();
        canvas.clear(Rgb::hex(0x000000));
        canvas.fill_text('x', 0.0, 0.0);
        assert_eq!(f.cell_at_index(0), Cell::blank(Rgb::hex(0x000000)));

        f.resize(4, 0);
        assert!(f.canvas().is_some());
        f.resize(4, 4);
        assert!(f.canvas().is_some());
    }

    #[test]
    fn non_positive_cell_size_has_no_canvas() {
        let mut f = Frame::new(4, 4, 0.0);
        assert!(f.canvas().is_none());
    }

    #[test]
    fn fill_text_lands_on_nearest_row() {
        let mut f = Frame::new(4, 4, 10.0);
        f.set_fill(Rgb::hex(0x00ff00));
        f.fill_text('a', 12.0, 14.0);
        f.fill_text('b', 30.0, 16.0);
        assert_eq!(f.get(1, 1).unwrap().ch, 'a');
        assert_eq!(f.get(3, 2).unwrap().ch, 'b');
        assert_eq!(f.get(3, 2).unwrap().fg, Rgb::hex(0x00ff00));
    }

    #[test]
    fn off_grid_and_transparent_text_is_dropped() {
        let mut f = Frame::new(2, 2, 10.0);
        f.fill_text('x', -1.0, 0.0);
        f.fill_text('x', 0.0, -20.0);
        f.fill_text('x', 25.0, 0.0);
        f.set_alpha(0.0);
        f.fill_text('x', 0.0, 0.0);
        assert!((0..4).all(|i| f.cell_at_index(i).is_blank()));
    }

    #[test]
    fn clear_blanks_every_cell_with_background() {
        let mut f = Frame::new(2, 1, 10.0);
        f.fill_text('x', 0.0, 0.0);
        f.clear(Rgb::hex(0x101010));
        assert_eq!(f.get(0, 0), Some(&Cell::blank(Rgb::hex(0x101010))));
    }

    #[test]
    fn alpha_blends_toward_background_and_glow_sets_bold() {
        let mut f = Frame::new(1, 1, 10.0);
        f.clear(Rgb::hex(0x000000));
        f.set_fill(Rgb::hex(0xc8c8c8));
        f.set_alpha(0.5);
        f.set_glow(true);
        f.fill_text('z', 0.0, 0.0);
        let c = f.get(0, 0).unwrap();
        assert_eq!(c.fg, Rgb::hex(0x646464));
        assert!(c.bold);
    }
}
