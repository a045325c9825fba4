// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::config::RainConfig;
use crate::glyph::{Catalog, Glyph};

/// Limits derived from the surface height, recomputed on every resize.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Glyphs visible in one column.
    pub capacity: usize,
    pub min_sentence: usize,
    pub max_sentence: f32,
    /// Gap length below which an open gap always keeps growing.
    pub min_empty: usize,
    pub trim_above: usize,
    pub trim_to: usize,
}

impl Thresholds {
    pub fn new(height: f32, config: &RainConfig) -> Self {
        let glyph = config.glyph_size.max(f32::MIN_POSITIVE);
        let capacity = (height.max(0.0) / glyph).floor() as usize + 1;
        let ratio = config.empty_ratio;

        Self {
            capacity,
            min_sentence: (capacity as f64 * (1.0 - ratio)).floor() as usize,
            max_sentence: capacity as f32 / config.sentence_divisor,
            min_empty: (capacity as f64 * ratio).floor() as usize,
            trim_above: config.trim_threshold * capacity,
            trim_to: (config.trim_keep * capacity).min(config.trim_threshold * capacity),
        }
    }
}

/// Everything a column step reads besides the column itself.
pub struct StepContext<'a> {
    pub catalog: &'a Catalog,
    pub thresholds: &'a Thresholds,
    pub glyph_size: f32,
    pub empty_ratio: f64,
    pub flicker_chance: f64,
}

/// What a single step prepended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Growth {
    /// Still entirely above the visible area.
    Skipped,
    Gap,
    Sentence(usize),
}

/// A vertical stream of glyphs. Glyph `i` is drawn at `y + i * glyph_size`,
/// so index 0 is the topmost, newest glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub glyphs: Vec<Glyph>,
    pub gap_streak: usize,
}

impl Column {
    pub fn new(x: f32, speed: f32, starts_blank: bool, blank: Glyph) -> Self {
        Self {
            x,
            y: 0.0,
            speed,
            glyphs: vec![blank],
            gap_streak: usize::from(starts_blank),
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, ctx: &StepContext<'_>, rng: &mut R) -> Growth {
        self.y += self.speed;

        if rng.random_bool(ctx.flicker_chance) {
            self.flicker(ctx.catalog, rng);
        }

        if self.y < -ctx.glyph_size {
            return Growth::Skipped;
        }

        let growth = if self.extends_gap(ctx, rng) {
            self.prepend_gap(ctx.catalog.blank(), ctx.glyph_size);
            Growth::Gap
        } else {
            let t = ctx.thresholds;
            let mut sentence = ctx
                .catalog
                .random_sentence(rng, t.min_sentence, t.max_sentence);
            if let Some(last) = sentence.last_mut() {
                *last = last.highlighted();
            }
            Growth::Sentence(self.prepend_sentence(sentence, ctx.glyph_size))
        };

        self.trim(ctx.thresholds);
        growth
    }

    fn extends_gap<R: Rng + ?Sized>(&self, ctx: &StepContext<'_>, rng: &mut R) -> bool {
        if self.gap_streak > 0 {
            rng.random_range(0..self.gap_streak) < ctx.thresholds.min_empty
        } else {
            rng.random_bool(ctx.empty_ratio)
        }
    }

    /// Swaps the character of one random glyph, keeping its color and alpha.
    pub fn flicker<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        if self.glyphs.is_empty() {
            return;
        }
        let i = rng.random_range(0..self.glyphs.len());
        self.glyphs[i].text = catalog.random_glyph(rng).text;
    }

    pub fn prepend_gap(&mut self, blank: Glyph, glyph_size: f32) {
        self.gap_streak += 1;
        self.glyphs.insert(0, blank);
        self.y -= glyph_size;
    }

    /// Puts `sentence` ahead of the buffer, moving `y` up by its height so
    /// glyphs already on screen stay where they are. Returns its length.
    pub fn prepend_sentence(&mut self, sentence: Vec<Glyph>, glyph_size: f32) -> usize {
        let len = sentence.len();
        self.gap_streak = 0;
        self.y -= len as f32 * glyph_size;
        self.glyphs.splice(0..0, sentence);
        len
    }

    pub fn trim(&mut self, t: &Thresholds) {
        if self.glyphs.len() > t.trim_above {
            self.glyphs.truncate(t.trim_to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::glyph::ColorTag;

    fn catalog() -> Catalog {
        Catalog::new(&RainConfig::default().alphabet)
    }

    fn ctx<'a>(catalog: &'a Catalog, t: &'a Thresholds) -> StepContext<'a> {
        StepContext {
            catalog,
            thresholds: t,
            glyph_size: 24.0,
            empty_ratio: 0.2,
            flicker_chance: 0.4,
        }
    }

    #[test]
    fn thresholds_for_a_240_unit_surface() {
        let t = Thresholds::new(216.0, &RainConfig::default());
        assert_eq!(t.capacity, 10);
        assert_eq!(t.min_sentence, 8);
        assert!((t.max_sentence - 7.142857).abs() < 1e-4);
        assert_eq!(t.min_empty, 2);
        assert_eq!((t.trim_above, t.trim_to), (30, 20));
    }

    #[test]
    fn fully_hidden_column_only_moves() {
        let c = catalog();
        let t = Thresholds::new(216.0, &RainConfig::default());
        let mut rng = StdRng::seed_from_u64(11);

        let mut col = Column::new(0.0, 3.0, false, c.blank());
        col.y = -50.0;
        let before = col.glyphs.len();
        let growth = col.step(&ctx(&c, &t), &mut rng);

        assert_eq!(growth, Growth::Skipped);
        assert_eq!(col.y, -47.0);
        assert_eq!(col.glyphs.len(), before);
        assert_eq!(col.gap_streak, 0);
    }

    #[test]
    fn forced_sentence_with_inverted_bounds() {
        // capacity 10, emptyRatio 0.2: min 8, max 7.14
        let c = catalog();
        let t = Thresholds::new(216.0, &RainConfig::default());
        let mut rng = StdRng::seed_from_u64(5);

        let mut col = Column::new(48.0, 2.0, false, c.blank());
        let mut sentence = c.random_sentence(&mut rng, t.min_sentence, t.max_sentence);
        assert_eq!(sentence.len(), 7);
        if let Some(last) = sentence.last_mut() {
            *last = last.highlighted();
        }
        let n = col.prepend_sentence(sentence, 24.0);

        assert_eq!(n, 7);
        assert_eq!(col.y, -168.0);
        assert_eq!(col.glyphs.len(), 8);
        assert_eq!(col.glyphs[6].tag, ColorTag::Highlight);
        assert!(col.glyphs[..6].iter().all(|g| g.tag == ColorTag::Base));
        assert!(col.glyphs[7].is_blank());
    }

    #[test]
    fn gap_prepends_one_blank_and_counts_the_streak() {
        let c = catalog();
        let mut col = Column::new(0.0, 2.0, true, c.blank());
        col.prepend_gap(c.blank(), 24.0);
        assert_eq!(col.gap_streak, 2);
        assert_eq!(col.y, -24.0);
        assert!(col.glyphs[0].is_blank());

        col.prepend_sentence(vec![Glyph::new('a')], 24.0);
        assert_eq!(col.gap_streak, 0);
    }

    #[test]
    fn short_gaps_always_continue() {
        let c = catalog();
        let t = Thresholds::new(216.0, &RainConfig::default());
        let mut rng = StdRng::seed_from_u64(9);
        let mut context = ctx(&c, &t);
        context.flicker_chance = 0.0;

        // a gap shorter than min_empty (2) keeps growing
        let mut col = Column::new(0.0, 1.0, true, c.blank());
        assert_eq!(col.step(&context, &mut rng), Growth::Gap);
        assert_eq!(col.gap_streak, 2);
    }

    #[test]
    fn long_gaps_give_way_to_a_sentence() {
        let c = catalog();
        let t = Thresholds::new(216.0, &RainConfig::default());
        assert_eq!(t.min_empty, 2);
        let mut context = ctx(&c, &t);
        context.flicker_chance = 0.0;
        let mut rng = StdRng::seed_from_u64(17);

        let mut col = Column::new(0.0, 1.0, true, c.blank());
        col.gap_streak = 20;
        let mut emitted = false;
        for _ in 0..10 {
            col.y = 0.0;
            if let Growth::Sentence(_) = col.step(&context, &mut rng) {
                emitted = true;
                break;
            }
        }
        assert!(emitted);
        assert_eq!(col.gap_streak, 0);
    }

    #[test]
    fn gap_at_streak_20_continues_about_one_time_in_ten() {
        // continues with probability min_empty / gap_streak = 2 / 20
        let c = catalog();
        let t = Thresholds::new(216.0, &RainConfig::default());
        let mut context = ctx(&c, &t);
        context.flicker_chance = 0.0;
        let mut rng = StdRng::seed_from_u64(23);

        let mut gaps = 0;
        for _ in 0..2000 {
            let mut col = Column::new(0.0, 1.0, true, c.blank());
            col.gap_streak = 20;
            if col.step(&context, &mut rng) == Growth::Gap {
                gaps += 1;
            }
        }
        assert!((100..=300).contains(&gaps), "gaps = {}", gaps);
    }

    #[test]
    fn zero_empty_ratio_never_starts_a_gap() {
        let c = catalog();
        let config = RainConfig {
            empty_ratio: 0.0,
            ..RainConfig::default()
        };
        let t = Thresholds::new(480.0, &config);
        let mut rng = StdRng::seed_from_u64(3);
        let mut context = ctx(&c, &t);
        context.empty_ratio = 0.0;

        let mut col = Column::new(0.0, 2.0, false, c.blank());
        for _ in 0..50 {
            col.y = 0.0;
            assert!(matches!(col.step(&context, &mut rng), Growth::Sentence(_)));
        }
    }

    #[test]
    fn flicker_keeps_color_and_alpha() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(21);
        let mut col = Column::new(0.0, 2.0, false, c.blank());
        col.glyphs = vec![Glyph::new('a').highlighted(), c.blank()];
        for _ in 0..20 {
            col.flicker(&c, &mut rng);
        }
        assert_eq!(col.glyphs[0].tag, ColorTag::Highlight);
        assert_eq!(col.glyphs[0].alpha, 1.0);
        assert!(col.glyphs[1].is_blank());
    }

    #[test]
    fn trim_keeps_newest_glyphs() {
        let t = Thresholds::new(216.0, &RainConfig::default());
        let mut col = Column::new(0.0, 2.0, false, Glyph::new('z'));
        col.glyphs = (0..31).map(|_| Glyph::new('a')).collect();
        col.glyphs[0] = Glyph::new('n');
        col.trim(&t);
        assert_eq!(col.glyphs.len(), 20);
        assert_eq!(col.glyphs[0].text, 'n');

        col.trim(&t);
        assert_eq!(col.glyphs.len(), 20);
    }

    proptest! {
        #[test]
        fn buffer_stays_bounded_and_growth_is_exclusive(
            seed in any::<u64>(),
            height in 0.0f32..2000.0,
            frames in 1usize..300,
        ) {
            let c = catalog();
            let t = Thresholds::new(height, &RainConfig::default());
            let context = ctx(&c, &t);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut col = Column::new(0.0, 2.5, false, c.blank());

            for _ in 0..frames {
                let before = col.glyphs.len();
                let streak = col.gap_streak;
                let growth = col.step(&context, &mut rng);
                prop_assert!(col.glyphs.len() <= 3 * t.capacity);
                match growth {
                    Growth::Skipped => prop_assert_eq!(col.glyphs.len(), before),
                    Growth::Gap => {
                        prop_assert_eq!(col.gap_streak, streak + 1);
                        prop_assert!(col.glyphs[0].is_blank());
                    }
                    Growth::Sentence(n) => {
                        prop_assert_eq!(col.gap_streak, 0);
                        prop_assert!(n >= 1);
                        prop_assert!(col.glyphs[..n.min(col.glyphs.len())].iter().all(|g| !g.is_blank()));
                    }
                }
            }
        }
    }
}
