use std::time::Duration;

/// Finite schedule of pre-attempt delays: `0, unit, 2 * unit, ...`.
///
/// One item per attempt. The iterator is consumed by a single ping call and
/// cannot be restarted.
#[derive(Debug)]
pub struct LinearBackoff {
    next_attempt: usize,
    max_attempts: usize,
    unit: Duration,
}

impl LinearBackoff {
    pub fn new(max_attempts: usize, unit: Duration) -> Self {
        Self {
            next_attempt: 0,
            max_attempts,
            unit,
        }
    }
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.next_attempt >= self.max_attempts {
            return None;
        }
        let multiplier = u32::try_from(self.next_attempt).unwrap_or(u32::MAX);
        self.next_attempt += 1;
        Some(self.unit.saturating_mul(multiplier))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.max_attempts.saturating_sub(self.next_attempt);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LinearBackoff {}
