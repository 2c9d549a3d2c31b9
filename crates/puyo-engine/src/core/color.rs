use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Color of a single puyo.
///
/// An empty cell has no color, so boards store `Option<PuyoColor>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum PuyoColor {
    Red = 0,
    Green = 1,
    Blue = 2,
    Yellow = 3,
    Purple = 4,
}

impl Distribution<PuyoColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PuyoColor {
        match rng.random_range(0..PuyoColor::LEN) {
            0 => PuyoColor::Red,
            1 => PuyoColor::Green,
            2 => PuyoColor::Blue,
            3 => PuyoColor::Yellow,
            _ => PuyoColor::Purple,
        }
    }
}

impl PuyoColor {
    /// Number of colors in play.
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        PuyoColor::Red,
        PuyoColor::Green,
        PuyoColor::Blue,
        PuyoColor::Yellow,
        PuyoColor::Purple,
    ];

    /// Returns the single character representation of this color.
    ///
    /// # Examples
    ///
    /// ```
    /// use puyo_engine::PuyoColor;
    ///
    /// assert_eq!(PuyoColor::Red.as_char(), 'R');
    /// assert_eq!(PuyoColor::Purple.as_char(), 'P');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PuyoColor::Red => 'R',
            PuyoColor::Green => 'G',
            PuyoColor::Blue => 'B',
            PuyoColor::Yellow => 'Y',
            PuyoColor::Purple => 'P',
        }
    }

    /// Parses a color from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(PuyoColor::Red),
            'G' => Some(PuyoColor::Green),
            'B' => Some(PuyoColor::Blue),
            'Y' => Some(PuyoColor::Yellow),
            'P' => Some(PuyoColor::Purple),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_color_char_conversion() {
        for color in PuyoColor::ALL {
            assert_eq!(PuyoColor::from_char(color.as_char()), Some(color));
        }
        assert_eq!(PuyoColor::from_char('.'), None);
        assert_eq!(PuyoColor::from_char('r'), None);
    }

    #[test]
    fn test_random_colors_cover_all_variants() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = [false; PuyoColor::LEN];
        for _ in 0..200 {
            let color: PuyoColor = rng.random();
            seen[color as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every color should appear: {seen:?}");
    }
}
