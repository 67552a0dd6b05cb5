//! Obstacle placement randomness
//!
//! xorshift32: small, fast and fully determined by its seed, so a game
//! replayed with the same seed and inputs spawns identical obstacles.

/// xorshift32 generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Create a generator; a zero seed is replaced since zero is a fixed point
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_F491 } else { seed },
        }
    }

    /// Next raw value
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Value in `0..max`, or 0 when `max` is 0
    pub fn below(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.next_u32() % max
    }
}
