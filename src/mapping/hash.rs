//! Content-derived pseudo-randomness.
//!
//! Every "random" musical decision is a function of the node title, so the
//! same vault always sounds the same. An explicit seed perturbs the starting
//! value of the hash to re-roll a whole pass without touching wall-clock time.

/// Java-style string hash (`h = h * 31 + unit`) over UTF-16 code units,
/// wrapping at 32 bits.
fn fold_units(initial: i32, units: impl Iterator<Item = u16>) -> i32 {
    units.fold(initial, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
    })
}

/// splitmix64 finalizer, truncated to the hash width
fn mix_seed(seed: u64) -> i32 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    z as u32 as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TitleHasher {
    initial: i32,
    seed: Option<u64>,
}

impl TitleHasher {
    /// Pure content hashing, no seed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: Option<u64>) -> Self {
        Self {
            initial: seed.map(mix_seed).unwrap_or(0),
            seed,
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Raw signed hash. An empty string without a seed hashes to 0.
    pub fn hash(&self, text: &str) -> i32 {
        fold_units(self.initial, text.encode_utf16())
    }

    /// `|hash| mod 100`, the primary per-title roll
    pub fn percent(&self, title: &str) -> u32 {
        self.hash(title).unsigned_abs() % 100
    }

    /// Independent roll for one named decision about a title.
    pub fn roll(&self, title: &str, salt: &str) -> u32 {
        let h = fold_units(self.initial, title.encode_utf16());
        let h = fold_units(h, ":".encode_utf16().chain(salt.encode_utf16()));
        h.unsigned_abs()
    }

    /// Uniform pick in `0..len`; `len` must be non-zero.
    pub fn pick(&self, title: &str, salt: &str, len: usize) -> usize {
        debug_assert!(len > 0);
        self.roll(title, salt) as usize % len
    }
}
