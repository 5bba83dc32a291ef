/// Seeded pseudo-random number generator (Park-Miller multiplicative LCG).
///
/// The draw sequence for a given seed IS the visual identity of a snowflake,
/// so the recurrence is a format constant: modulus 2^31 - 1, multiplier
/// 16807, output `(state - 1) / (2^31 - 2)`. No external RNG can substitute.
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    const MODULUS: u64 = 2_147_483_647;
    const MULTIPLIER: u64 = 16_807;

    /// Seeds of 0 (mod 2^31 - 1) would lock the generator at zero, so they
    /// are remapped before the first draw.
    pub fn new(seed: u32) -> Self {
        let mut state = u64::from(seed) % Self::MODULUS;
        if state == 0 {
            state += Self::MODULUS - 1;
        }
        Self { state }
    }

    /// Next draw in [0, 1).
    pub fn next(&mut self) -> f64 {
        self.state = (self.state * Self::MULTIPLIER) % Self::MODULUS;
        (self.state - 1) as f64 / (Self::MODULUS - 1) as f64
    }
}
