//! Random sources for the simulation. Seeded runs use xorshift32 so a seed
//! reproduces the same output everywhere; unseeded runs draw from `rand`.

use rand::Rng;

/// Injectable source of uniform variates.
pub trait RandomSource {
    /// Next uniform variate in [0, 1).
    fn next_f64(&mut self) -> f64;
}

/// State substituted for a zero seed, which would lock xorshift at zero.
const ZERO_SEED_STATE: u32 = 0x9E37_79B9;

/// Marsaglia xorshift32 (13/17/5).
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_STATE } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl RandomSource for Xorshift32 {
    /// Never returns exactly 0 since the state is never 0.
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Unseeded source backed by the thread-local generator.
pub struct ThreadRandom {
    inner: rand::rngs::ThreadRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            inner: rand::thread_rng(),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Standard normal variate via the Box-Muller transform (cosine branch).
pub fn standard_normal<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    let u1 = rng.next_f64().max(f64::MIN_POSITIVE);
    let u2 = rng.next_f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
