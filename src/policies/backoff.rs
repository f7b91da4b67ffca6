//! # Backoff between retry attempts.
//!
//! [`RetryBackoff`] computes the pause inserted before attempt `n + 1` after
//! attempt `n` failed. The base delay is derived purely from the attempt
//! number (`base × growth^(attempt-1)`, clamped to `cap`), so jitter output
//! never feeds back into later delays.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskgate::{Jitter, RetryBackoff};
//!
//! let backoff = RetryBackoff {
//!     base: Duration::from_millis(100),
//!     cap: Duration::from_secs(10),
//!     growth: 2.0,
//!     jitter: Jitter::None,
//! };
//!
//! // After the first failed attempt: the base delay.
//! assert_eq!(backoff.delay(1), Duration::from_millis(100));
//! // After the second: base × growth.
//! assert_eq!(backoff.delay(2), Duration::from_millis(200));
//! // Far out: clamped to the cap.
//! assert_eq!(backoff.delay(20), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::Jitter;

/// Exponential backoff with a cap and optional jitter.
#[derive(Clone, Copy, Debug)]
pub struct RetryBackoff {
    /// Delay after the first failed attempt.
    pub base: Duration,
    /// Upper bound on any delay.
    pub cap: Duration,
    /// Multiplicative growth per further attempt (`>= 1.0` recommended).
    pub growth: f64,
    /// Randomization applied to the clamped delay.
    pub jitter: Jitter,
}

impl Default for RetryBackoff {
    /// Returns a backoff with:
    /// - `base = 100ms`
    /// - `cap = 30s`
    /// - `growth = 2.0`
    /// - `jitter = Jitter::None`
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            cap: Duration::from_secs(30),
            growth: 2.0,
            jitter: Jitter::None,
        }
    }
}

impl RetryBackoff {
    /// Computes the delay before the attempt following attempt number
    /// `attempt` (1-based: `delay(1)` paces the second attempt).
    ///
    /// Overflowing or non-finite intermediate values clamp to `cap`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let cap_secs = self.cap.as_secs_f64();
        let raw = self.base.as_secs_f64() * self.growth.powi(exponent);
        let clamped = if !raw.is_finite() || raw < 0.0 || raw > cap_secs {
            self.cap
        } else {
            Duration::from_secs_f64(raw)
        };
        self.jitter.apply(clamped)
    }
}
