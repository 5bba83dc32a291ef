use givre_shared::hash::hash_string;

use crate::rng::SeededRng;

/// Structured parameters controlling one snowflake's geometry.
///
/// A pure function of the seed source; recomputed on demand, never persisted
/// independently of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlakeParams {
    /// Radial branches. Snowflakes always have six.
    pub branches: u32,
    /// Concentric stations per branch, 3..=7.
    pub complexity: u32,
    /// Side-branch length scale in [0.85, 1.15).
    pub symmetry: f64,
    /// Hash of the seed source, re-seeded by the renderer.
    pub seed: u32,
}

/// Derive stable geometry for a (text, signature) pair.
///
/// The trimmed signature wins as seed source when non-empty, so the same
/// message crystallizes differently under different signatures.
pub fn derive_params(text: &str, signature: &str) -> FlakeParams {
    let trimmed = signature.trim();
    let source = if trimmed.is_empty() { text } else { trimmed };
    let seed = hash_string(source);

    let mut rng = SeededRng::new(seed);
    FlakeParams {
        branches: 6,
        complexity: (rng.next() * 5.0).floor() as u32 + 3,
        symmetry: rng.next() * 0.3 + 0.85,
        seed,
    }
}
