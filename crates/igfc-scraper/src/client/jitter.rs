use std::time::Duration;

use rand::Rng;

/// Courtesy delay window applied before every logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct JitterWindow {
    pub(super) min_ms: u64,
    pub(super) max_ms: u64,
}

impl JitterWindow {
    pub(super) fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}
