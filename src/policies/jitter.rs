//! # Jitter for retry delays.
//!
//! Randomizing backoff keeps simultaneous retries (many tasks failing on the
//! same broken resource) from re-converging on it in lockstep.

use std::time::Duration;

use rand::Rng;

/// Randomization applied to a computed backoff delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Jitter {
    /// No randomization; the exact computed delay.
    #[default]
    None,
    /// Uniform in `[0, delay]` — maximum spread, may retry immediately.
    Full,
    /// `delay/2 + uniform[0, delay/2]` — spread while keeping at least half
    /// the computed pause.
    Equal,
}

impl Jitter {
    /// Applies this jitter to `delay`.
    pub fn apply(&self, delay: Duration) -> Duration {
        let ms = delay.as_millis() as u64;
        match self {
            Jitter::None => delay,
            Jitter::Full => {
                if ms == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_millis(rand::rng().random_range(0..=ms))
                }
            }
            Jitter::Equal => {
                let half = ms / 2;
                if half == 0 {
                    delay
                } else {
                    Duration::from_millis(half + rand::rng().random_range(0..=half))
                }
            }
        }
    }
}
