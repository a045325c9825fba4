// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::column::{StepContext, Thresholds};
use crate::config::RainConfig;
use crate::error::{RainError, Result};
use crate::glyph::{Catalog, ColorTag};
use crate::palette::{theme, Theme};
use crate::pool::Pool;
use crate::runtime::BoldMode;
use crate::surface::Surface;

/// One rain instance bound to one surface.
pub struct Engine<S: Surface> {
    surface: S,
    config: RainConfig,
    theme: Theme,
    catalog: Catalog,
    pool: Pool,
    thresholds: Thresholds,
    width: f32,
    height: f32,
    rng: StdRng,
    frames: u64,
}

impl<S: Surface> Engine<S> {
    /// Fails with [`RainError::SurfaceUnsupported`] when the surface has no
    /// 2D context. Seeds from `config.seed`, or the OS when unset.
    pub fn new(surface: S, config: RainConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(surface, config, rng)
    }

    pub fn with_rng(mut surface: S, config: RainConfig, rng: StdRng) -> Result<Self> {
        if surface.canvas().is_none() {
            return Err(RainError::SurfaceUnsupported);
        }

        let catalog = Catalog::new(&config.alphabet);
        let mut engine = Self {
            surface,
            theme: theme(config.scheme),
            thresholds: Thresholds::new(0.0, &config),
            config,
            catalog,
            pool: Pool::new(),
            width: 0.0,
            height: 0.0,
            rng,
            frames: 0,
        };
        engine.resize();

        info!(
            columns = engine.pool.len(),
            capacity = engine.thresholds.capacity,
            glyphs = engine.catalog.len(),
            "rain engine ready"
        );
        Ok(engine)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Re-reads the surface size and extends the pool to cover it. Existing
    /// columns are never modified.
    pub fn resize(&mut self) {
        let dims = self.surface.dimensions();
        self.width = dims.width;
        self.height = dims.height;
        self.thresholds = Thresholds::new(self.height, &self.config);

        let added = self
            .pool
            .fill(self.width, &self.config, self.catalog.blank(), &mut self.rng);

        debug!(
            width = self.width,
            height = self.height,
            capacity = self.thresholds.capacity,
            added,
            visible = self.pool.visible(self.width).count(),
            "surface resized"
        );
    }

    /// Advances every visible column by one frame.
    pub fn update(&mut self) {
        let ctx = StepContext {
            catalog: &self.catalog,
            thresholds: &self.thresholds,
            glyph_size: self.config.glyph_size,
            empty_ratio: self.config.empty_ratio,
            flicker_chance: self.config.flicker_chance,
        };
        let rng = &mut self.rng;
        self.pool.advance(self.width, |column| {
            column.step(&ctx, rng);
        });
    }

    /// Clears the surface and paints every visible column.
    pub fn paint(&mut self) -> Result<()> {
        let glyph_size = self.config.glyph_size;
        let (width, height) = (self.width, self.height);
        let bold = self.config.bold;
        let theme = self.theme;

        let canvas = self
            .surface
            .canvas()
            .ok_or(RainError::SurfaceUnsupported)?;
        canvas.clear(theme.background);

        for column in self.pool.visible(width) {
            for (i, glyph) in column.glyphs.iter().enumerate() {
                let y = column.y + i as f32 * glyph_size;
                if y < -glyph_size {
                    continue;
                }
                if y > height {
                    break;
                }
                canvas.set_fill(theme.color(glyph.tag));
                canvas.set_alpha(glyph.alpha);
                canvas.set_glow(match bold {
                    BoldMode::Off => false,
                    BoldMode::Highlight => glyph.tag == ColorTag::Highlight,
                    BoldMode::All => true,
                });
                canvas.fill_text(glyph.text, column.x, y);
            }
        }
        Ok(())
    }

    /// One full frame: update then paint.
    pub fn frame(&mut self) -> Result<()> {
        self.update();
        self.paint()?;
        self.frames += 1;
        Ok(())
    }
}
