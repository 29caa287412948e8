//! Deterministic Random Number Generator
//!
//! Xorshift128+ seeded through SplitMix64. Terrain generation draws from it
//! so a game's map is fully reproducible from its seed.

use sha2::{Sha256, Digest};

/// Seeded Xorshift128+ stream.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    s0: u64,
    s1: u64,
}

impl DeterministicRng {
    /// Seed a stream. Equal seeds give equal streams on every platform.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let (s0, s1) = (splitmix64(&mut sm), splitmix64(&mut sm));
        // Xorshift is stuck at the all-zero state
        if s0 | s1 == 0 {
            return Self { s0: 1, s1: 1 };
        }
        Self { s0, s1 }
    }

    /// Next raw 64-bit output.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let (a, mut b) = (self.s0, self.s1);
        let out = a.wrapping_add(b);
        b ^= a;
        self.s0 = a.rotate_left(24) ^ b ^ (b << 16);
        self.s1 = b.rotate_left(37);
        out
    }

    /// True with probability `percent / 100`; 0 never fires, 100 always does.
    #[inline]
    pub fn roll_percent(&mut self, percent: u8) -> bool {
        self.next_u64() % 100 < u64::from(percent)
    }
}

#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive the terrain seed of one game from the server's base seed.
///
/// Distinct games on the same server get unrelated maps; the same
/// (base seed, game id) pair always yields the same map.
pub fn derive_game_seed(base_seed: u64, game_id: u32) -> u64 {
    let digest = Sha256::new()
        .chain_update(b"HEX_TACTICS_TERRAIN_V1")
        .chain_update(base_seed.to_le_bytes())
        .chain_update(game_id.to_le_bytes())
        .finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

// =============================================================================
// TESTS
// =============================================================================
