//! Dungeon growth: registry bookkeeping, greedy placement, capping, wall fill
//! and the driver that sequences them.

pub mod capping;
pub mod flagging;
pub mod generator;
pub mod placement;
pub mod registry;
pub mod walls;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

pub use capping::{cap_all, CapReport};
pub use flagging::flag;
pub use generator::{generate, GenerationReport, Generator, Phase, StepReport};
pub use placement::{try_place, PlacementResult, Rejection};
pub use registry::{rebuild, ConnectionPoint, ConnectionRegistry};
pub use walls::{fill_gaps, WallReport};

/// Root seed of a dungeon. Each level draws its own RNG stream from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonSeed {
    pub seed: u64,
}

impl Default for DungeonSeed {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl DungeonSeed {
    /// Deterministic level hash from the root seed and level number
    pub fn level_hash(&self, level: u32) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(level.to_le_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    pub fn rng(&self, level: u32) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(self.level_hash(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_level_hash_deterministic() {
        let seed = DungeonSeed { seed: 12345 };
        assert_eq!(seed.level_hash(1), seed.level_hash(1));
    }

    #[test]
    fn test_levels_differ() {
        let seed = DungeonSeed { seed: 12345 };
        assert_ne!(seed.level_hash(1), seed.level_hash(2));
        assert_ne!(
            seed.level_hash(1),
            DungeonSeed { seed: 12346 }.level_hash(1)
        );
    }

    #[test]
    fn test_rng_streams_repeat() {
        let seed = DungeonSeed::default();
        let mut a = seed.rng(3);
        let mut b = seed.rng(3);
        for _ in 0..8 {
            assert_eq!(a.gen::<u32>(), b.gen::<u32>());
        }
    }
}
