//! # Fibonacci Backoff
//!
//! Delay between retries of a request whose connection was reset.
//! Grows more slowly than exponential backoff: with a 250ms minimum the
//! sequence is 250ms, 250ms, 500ms, 750ms, 1.25s, 2s, ... capped at the maximum.

use std::time::Duration;

/// Fibonacci backoff calculator
///
/// Each delay is the sum of the previous two, starting from `min` twice.
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    /// Minimum backoff in milliseconds (for reset)
    min_ms: u64,
    /// Previous backoff in milliseconds
    prev_ms: u64,
    /// Current backoff in milliseconds
    current_ms: u64,
    /// Maximum backoff in milliseconds
    max_ms: u64,
}

impl Default for FibonacciBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(250), Duration::from_secs(5))
    }
}

impl FibonacciBackoff {
    /// Create a new Fibonacci backoff with the given minimum and maximum delays
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        let min_ms = u64::try_from(min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX).max(min_ms);
        Self {
            min_ms,
            prev_ms: 0,
            current_ms: min_ms,
            max_ms,
        }
    }

    /// Get the next delay and advance the sequence
    pub fn next_backoff(&mut self) -> Duration {
        let result = self.current_ms;

        let next = self.prev_ms.saturating_add(self.current_ms);
        self.prev_ms = self.current_ms;
        self.current_ms = std::cmp::min(next, self.max_ms);

        Duration::from_millis(result)
    }

    /// Reset the backoff to the initial state
    pub fn reset(&mut self) {
        self.prev_ms = 0;
        self.current_ms = self.min_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fibonacci_backoff_sequence() {
        let mut backoff = FibonacciBackoff::new(ms(100), ms(1000));

        assert_eq!(backoff.next_backoff(), ms(100));
        assert_eq!(backoff.next_backoff(), ms(100));
        assert_eq!(backoff.next_backoff(), ms(200));
        assert_eq!(backoff.next_backoff(), ms(300));
        assert_eq!(backoff.next_backoff(), ms(500));
        assert_eq!(backoff.next_backoff(), ms(800));
        assert_eq!(backoff.next_backoff(), ms(1000)); // capped
        assert_eq!(backoff.next_backoff(), ms(1000));
    }

    #[test]
    fn test_fibonacci_backoff_reset() {
        let mut backoff = FibonacciBackoff::new(ms(100), ms(1000));

        backoff.next_backoff();
        backoff.next_backoff();
        backoff.next_backoff();

        backoff.reset();

        assert_eq!(backoff.next_backoff(), ms(100));
        assert_eq!(backoff.next_backoff(), ms(100));
        assert_eq!(backoff.next_backoff(), ms(200));
    }

    #[test]
    fn test_max_below_min_is_raised() {
        let mut backoff = FibonacciBackoff::new(ms(500), ms(100));
        assert_eq!(backoff.next_backoff(), ms(500));
        assert_eq!(backoff.next_backoff(), ms(500));
        assert_eq!(backoff.next_backoff(), ms(500));
    }
}
