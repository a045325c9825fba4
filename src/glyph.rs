// Copyright (c) 2026 rezky_nightky

use rand::{seq::SliceRandom, Rng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTag {
    Base,
    Dim,
    Highlight,
}

/// One drawable character. Copied by value, so every column owns its glyphs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub text: char,
    pub alpha: f32,
    pub tag: ColorTag,
}

impl Glyph {
    pub const fn new(text: char) -> Self {
        Self {
            text,
            alpha: 1.0,
            tag: ColorTag::Base,
        }
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn highlighted(self) -> Self {
        Self {
            tag: ColorTag::Highlight,
            ..self
        }
    }
}

/// Fixed alphabet the rain draws from.
#[derive(Clone, Debug)]
pub struct Catalog {
    glyphs: Vec<Glyph>,
    blank: Glyph,
}

impl Catalog {
    /// Builds a catalog from `chars`, dropping repeats so sentences never
    /// contain the same character twice.
    pub fn new(chars: &[char]) -> Self {
        let mut glyphs: Vec<Glyph> = Vec::with_capacity(chars.len());
        for &ch in chars {
            if !glyphs.iter().any(|g| g.text == ch) {
                glyphs.push(Glyph::new(ch));
            }
        }
        if glyphs.is_empty() {
            glyphs.push(Glyph::new('0'));
            glyphs.push(Glyph::new('1'));
        }

        let blank = Glyph {
            alpha: 0.0,
            ..glyphs[0]
        };

        Self { glyphs, blank }
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn blank(&self) -> Glyph {
        self.blank
    }

    pub fn random_glyph<R: Rng + ?Sized>(&self, rng: &mut R) -> Glyph {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }

    /// Shuffles the whole alphabet and keeps a prefix whose length follows
    /// [`sentence_len`].
    pub fn random_sentence<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min_len: usize,
        max_len: f32,
    ) -> Vec<Glyph> {
        let len = sentence_len(rng, min_len, max_len, self.glyphs.len());
        let mut deck = self.glyphs.clone();
        deck.shuffle(rng);
        deck.truncate(len);
        deck
    }
}

/// Length of the next sentence.
///
/// With ordered bounds the length is uniform in `[min_len, max_len)`. Tall
/// surfaces invert them (`min_len` grows with `0.8 * capacity`, `max_len`
/// with `capacity / 1.4`); the bounds are then read as an unordered range and
/// the length is uniform in `[floor(max_len), min_len)`, or exactly `min_len`
/// when that range is empty. The result is always clamped to
/// `1..=available`.
pub fn sentence_len<R: Rng + ?Sized>(
    rng: &mut R,
    min_len: usize,
    max_len: f32,
    available: usize,
) -> usize {
    let max_len = max_len.max(0.0);
    let upper = max_len.ceil() as usize;

    let (low, high) = if upper > min_len {
        (min_len, upper)
    } else {
        let floor = max_len.floor() as usize;
        if floor < min_len {
            (floor, min_len)
        } else {
            (min_len, min_len + 1)
        }
    };

    rng.random_range(low..high).clamp(1, available.max(1))
}
