use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ParseSeedError, core::pair::ColorPair};

/// Supplies the color pairs a session spawns.
///
/// Colors are drawn uniformly from a [`Pcg32`] generator. An optional script
/// of pairs is handed out first, which is how puzzle setups and tests get a
/// known sequence.
///
/// The buffer always holds the next pair, so [`Self::peek_next`] can show it
/// as a preview.
///
/// # Example
///
/// ```
/// use puyo_engine::{ColorPair, PairBuffer, PuyoColor};
/// use rand::Rng as _;
///
/// let script = [ColorPair::new(PuyoColor::Red, PuyoColor::Blue)];
/// let mut buffer = PairBuffer::scripted(script, rand::rng().random());
///
/// assert_eq!(buffer.peek_next(), script[0]);
/// assert_eq!(buffer.pop_next(), script[0]);
/// // random pairs follow
/// let _ = buffer.pop_next();
/// ```
#[derive(Debug, Clone)]
pub struct PairBuffer {
    rng: Pcg32,
    scripted: VecDeque<ColorPair>,
    next: ColorPair,
}

impl Default for PairBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic pair generation.
///
/// A 128-bit value written as 32 hex digits, both in serialized form and on
/// the command line. Two buffers built from the same seed produce the same
/// pairs.
///
/// ```
/// use puyo_engine::PairSeed;
///
/// let seed: PairSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
/// assert!("xyz".parse::<PairSeed>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSeed([u8; 16]);

impl PairSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PairSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PairSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PairSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<PairSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PairSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PairSeed(seed)
    }
}

impl PairBuffer {
    /// Creates a buffer with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(seed: PairSeed) -> Self {
        Self::scripted([], seed)
    }

    /// Creates a buffer that yields `pairs` in order before generating
    /// random pairs from `seed`.
    #[must_use]
    pub fn scripted(pairs: impl IntoIterator<Item = ColorPair>, seed: PairSeed) -> Self {
        let mut rng = Pcg32::from_seed(seed.0);
        let mut scripted = pairs.into_iter().collect::<VecDeque<_>>();
        let next = scripted.pop_front().unwrap_or_else(|| rng.random());
        Self {
            rng,
            scripted,
            next,
        }
    }

    /// Takes the next pair and queues the following one.
    pub fn pop_next(&mut self) -> ColorPair {
        let following = self
            .scripted
            .pop_front()
            .unwrap_or_else(|| self.rng.random());
        std::mem::replace(&mut self.next, following)
    }

    /// Returns the pair [`Self::pop_next`] would return.
    #[must_use]
    pub const fn peek_next(&self) -> ColorPair {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::PuyoColor;

    const SEED: PairSeed = PairSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    mod pair_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PairSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PairSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // big-endian: first byte comes first
            let seed = PairSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PairSeed([0; 16]);
            assert_eq!(seed.to_string(), "00000000000000000000000000000000");
            assert_eq!(seed.to_string().parse::<PairSeed>().unwrap(), seed);
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PairSeed = "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF".parse().unwrap();
            assert_eq!(seed, PairSeed([0xFF; 16]));
        }

        #[test]
        fn test_parse_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
                "+123456789abcdef0123456789abcdef",
            ] {
                let err = input.parse::<PairSeed>().unwrap_err();
                assert_eq!(err.input, input);
            }

            let result: Result<PairSeed, _> = serde_json::from_str("\"abc\"");
            assert!(result.unwrap_err().to_string().contains("32 hex digits"));
        }
    }

    #[test]
    fn test_deterministic_pair_generation() {
        let mut buffer1 = PairBuffer::with_seed(SEED);
        let mut buffer2 = PairBuffer::with_seed(SEED);
        for _ in 0..50 {
            assert_eq!(buffer1.peek_next(), buffer2.peek_next());
            assert_eq!(buffer1.pop_next(), buffer2.pop_next());
        }
    }

    #[test]
    fn test_peek_matches_pop() {
        let mut buffer = PairBuffer::with_seed(SEED);
        for _ in 0..20 {
            let peeked = buffer.peek_next();
            assert_eq!(buffer.pop_next(), peeked);
        }
    }

    #[test]
    fn test_script_comes_first() {
        let script = [
            ColorPair::new(PuyoColor::Red, PuyoColor::Red),
            ColorPair::new(PuyoColor::Green, PuyoColor::Blue),
            ColorPair::new(PuyoColor::Purple, PuyoColor::Yellow),
        ];
        let mut buffer = PairBuffer::scripted(script, SEED);
        for pair in script {
            assert_eq!(buffer.pop_next(), pair);
        }

        // after the script the generator starts from the seed's beginning
        let mut plain = PairBuffer::with_seed(SEED);
        for _ in 0..10 {
            assert_eq!(buffer.pop_next(), plain.pop_next());
        }
    }
}
