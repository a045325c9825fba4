// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::column::Column;
use crate::config::RainConfig;
use crate::glyph::Glyph;

/// Columns ordered left to right, column `i` sitting at `i * glyph_size`.
///
/// The pool only ever grows. After a shrink, columns at or past the new width
/// are kept but neither advanced nor painted, so growing back resumes them.
#[derive(Clone, Debug, Default)]
pub struct Pool {
    front: Vec<Column>,
    back: Vec<Column>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.front.len()
    }

    #[cfg(test)]
    pub fn columns(&self) -> &[Column] {
        &self.front
    }

    /// Columns whose `x` lies inside `[0, width)`.
    pub fn visible(&self, width: f32) -> impl Iterator<Item = &Column> + '_ {
        self.front.iter().take_while(move |c| c.x < width)
    }

    /// Appends columns until the surface width is covered. Returns how many
    /// were added; zero when `width` has not grown past the last column.
    pub fn fill<R: Rng + ?Sized>(
        &mut self,
        width: f32,
        config: &RainConfig,
        blank: Glyph,
        rng: &mut R,
    ) -> usize {
        let before = self.front.len();
        loop {
            let x = self.front.len() as f32 * config.glyph_size;
            if x >= width {
                break;
            }
            let speed = rng.random_range(config.speed_min..config.speed_max);
            let starts_blank = rng.random_bool(config.empty_ratio);
            self.front.push(Column::new(x, speed, starts_blank, blank));
        }
        self.front.len() - before
    }

    /// Builds the next state of every visible column into the back buffer,
    /// then swaps, so no half-updated pool is ever observable.
    pub fn advance<F>(&mut self, width: f32, mut step: F)
    where
        F: FnMut(&mut Column),
    {
        self.back.truncate(self.front.len());
        for (i, column) in self.front.iter().enumerate() {
            match self.back.get_mut(i) {
                Some(next) => next.clone_from(column),
                None => self.back.push(column.clone()),
            }
            if column.x < width {
                step(&mut self.back[i]);
            }
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }
}
