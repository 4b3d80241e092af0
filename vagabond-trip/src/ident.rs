use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const ID_LEN: usize = 9;
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier for a day or an activity.
///
/// Identities are assigned once (at normalization or on insert) and stay
/// stable across reorders and cross-day moves. They carry no ordering or
/// positional meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Session-scoped generator of unique opaque identifiers.
///
/// Ids are nine characters of lowercase base-36, drawn from a seedable
/// ChaCha stream so tests can pin the exact sequence. Collisions are
/// negligible at session scale (tens to low hundreds of entities).
#[derive(Debug, Clone)]
pub struct IdSource {
    rng: ChaCha20Rng,
}

impl IdSource {
    /// Deterministic source for tests and reproducible sessions.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Produce the next identifier.
    pub fn next_id(&mut self) -> EntityId {
        let mut out = String::with_capacity(ID_LEN);
        for _ in 0..ID_LEN {
            let idx = self.rng.gen_range(0..ID_ALPHABET.len());
            out.push(ID_ALPHABET[idx] as char);
        }
        EntityId(out)
    }

    /// Draw a uniform index below `len`, for shuffle-style picks.
    pub fn pick_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.gen_range(0..len)
    }
}

impl Default for IdSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
