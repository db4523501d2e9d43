//! Local pacing of outbound completion requests against a per-minute
//! token quota.
//!
//! Token counts are a rough estimate (about four characters per
//! token), not what the API actually bills. Each operation on the
//! window is atomic but a check followed by a `record` is not, so
//! concurrent requests can overshoot the quota. Treat it as a soft
//! limit.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

/// Length of the rolling quota window
pub const WINDOW: Duration = Duration::from_secs(60);

/// Default tokens allowed per window
pub const DEFAULT_RATE_LIMIT: usize = 20_000;

/// Source of the current time for the pacer
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Uses tokio's clock so tests can pause and advance it
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Roughly 1 token per 4 characters
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

#[derive(Debug)]
struct TokenWindow {
    tokens_used: usize,
    window_start: Instant,
}

impl TokenWindow {
    fn reset(&mut self, now: Instant) {
        self.tokens_used = 0;
        self.window_start = now;
    }

    fn reset_if_expired(&mut self, now: Instant) {
        if now.saturating_duration_since(self.window_start) > WINDOW {
            self.reset(now);
        }
    }

    fn remaining(&self, now: Instant) -> Duration {
        WINDOW.saturating_sub(now.saturating_duration_since(self.window_start))
    }
}

pub struct TokenPacer {
    window: Mutex<TokenWindow>,
    rate_limit: usize,
    clock: Arc<dyn Clock>,
}

impl TokenPacer {
    pub fn new(rate_limit: usize) -> Self {
        Self::with_clock(rate_limit, Arc::new(SystemClock))
    }

    pub fn with_clock(rate_limit: usize, clock: Arc<dyn Clock>) -> Self {
        let window = TokenWindow {
            tokens_used: 0,
            window_start: clock.now(),
        };
        Self {
            window: Mutex::new(window),
            rate_limit,
            clock,
        }
    }

    pub fn rate_limit(&self) -> usize {
        self.rate_limit
    }

    pub fn tokens_used(&self) -> usize {
        self.window().tokens_used
    }

    /// Whether `estimated_tokens` more fit in the current window.
    /// Starts a fresh window first if the current one has expired.
    pub fn can_proceed(&self, estimated_tokens: usize) -> bool {
        let mut window = self.window();
        window.reset_if_expired(self.clock.now());
        window.tokens_used.saturating_add(estimated_tokens) <= self.rate_limit
    }

    /// How long to hold off before sending `estimated_tokens`, or
    /// `None` if the request can go now.
    pub fn retry_after(&self, estimated_tokens: usize) -> Option<Duration> {
        let now = self.clock.now();
        let mut window = self.window();
        window.reset_if_expired(now);
        if window.tokens_used.saturating_add(estimated_tokens) <= self.rate_limit {
            return None;
        }
        Some(window.remaining(now))
    }

    /// Count tokens against the current window. Doesn't check for
    /// expiry.
    pub fn record(&self, tokens_used: usize) {
        let mut window = self.window();
        window.tokens_used = window.tokens_used.saturating_add(tokens_used);
    }

    /// If the quota is already used up, wait out the rest of the
    /// window and start a new one.
    pub async fn wait_if_needed(&self) {
        let wait = {
            let window = self.window();
            if window.tokens_used < self.rate_limit {
                return;
            }
            window.remaining(self.clock.now())
        };
        self.wait_and_reset(wait).await;
    }

    /// Gate a request of `estimated_tokens`. When it doesn't fit in
    /// the current window this waits for the window to end and then
    /// starts a new one. Only the calling task is suspended.
    pub async fn pace(&self, estimated_tokens: usize) {
        if let Some(wait) = self.retry_after(estimated_tokens) {
            tracing::info!(
                "Rate limit approaching, waiting {:.1} seconds...",
                wait.as_secs_f64()
            );
            self.wait_and_reset(wait).await;
        }
    }

    async fn wait_and_reset(&self, wait: Duration) {
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.window().reset(self.clock.now());
    }

    fn window(&self) -> MutexGuard<'_, TokenWindow> {
        self.window.lock().expect("Token window lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ManualClock(Mutex<Instant>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Instant::now())))
        }

        fn advance(&self, by: Duration) {
            *self.0.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap()
        }
    }

    fn assert_waited(started: Instant, expected: Duration) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "waited {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("finance newsletters"), 4);
        // Characters, not bytes
        assert_eq!(estimate_tokens("éééé"), 1);
    }

    #[test]
    fn test_estimate_tokens_is_monotonic() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(10);
        let mut last = 0;
        for end in 0..=text.len() {
            let estimate = estimate_tokens(&text[..end]);
            assert!(estimate >= last);
            last = estimate;
        }
    }

    #[test]
    fn test_can_proceed_fresh_window() {
        let pacer = TokenPacer::with_clock(DEFAULT_RATE_LIMIT, ManualClock::new());
        assert!(pacer.can_proceed(0));
        assert!(pacer.can_proceed(DEFAULT_RATE_LIMIT));
        assert!(!pacer.can_proceed(DEFAULT_RATE_LIMIT + 1));
    }

    #[test]
    fn test_record_consumes_budget() {
        let pacer = TokenPacer::with_clock(100, ManualClock::new());
        pacer.record(60);
        assert_eq!(pacer.tokens_used(), 60);
        assert!(pacer.can_proceed(40));
        assert!(!pacer.can_proceed(41));
    }

    #[test]
    fn test_window_resets_after_a_minute() {
        let clock = ManualClock::new();
        let pacer = TokenPacer::with_clock(100, clock.clone());
        pacer.record(100);

        // Exactly 60 seconds is still the same window
        clock.advance(WINDOW);
        assert!(!pacer.can_proceed(1));
        assert_eq!(pacer.tokens_used(), 100);

        clock.advance(Duration::from_millis(1));
        assert!(pacer.can_proceed(1));
        assert_eq!(pacer.tokens_used(), 0);
    }

    #[test]
    fn test_record_does_not_reset() {
        let clock = ManualClock::new();
        let pacer = TokenPacer::with_clock(100, clock.clone());
        clock.advance(Duration::from_secs(120));
        pacer.record(30);
        pacer.record(30);
        assert_eq!(pacer.tokens_used(), 60);
    }

    #[test]
    fn test_retry_after() {
        let clock = ManualClock::new();
        let pacer = TokenPacer::with_clock(100, clock.clone());
        assert_eq!(pacer.retry_after(100), None);

        pacer.record(90);
        clock.advance(Duration::from_secs(15));
        assert_eq!(pacer.retry_after(10), None);
        assert_eq!(pacer.retry_after(11), Some(Duration::from_secs(45)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_if_needed_under_budget_returns_immediately() {
        let pacer = TokenPacer::new(100);
        pacer.record(99);
        let started = Instant::now();
        pacer.wait_if_needed().await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(pacer.tokens_used(), 99);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_if_needed_sleeps_out_the_window() {
        let pacer = TokenPacer::new(100);
        tokio::time::sleep(Duration::from_secs(20)).await;
        pacer.record(100);

        let started = Instant::now();
        pacer.wait_if_needed().await;

        assert_waited(started, Duration::from_secs(40));
        assert_eq!(pacer.tokens_used(), 0);
        assert!(pacer.can_proceed(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pace_waits_when_request_does_not_fit() {
        let pacer = TokenPacer::new(100);
        pacer.record(80);
        tokio::time::sleep(Duration::from_secs(10)).await;

        let started = Instant::now();
        pacer.pace(10).await;
        assert_eq!(started.elapsed(), Duration::ZERO);

        pacer.pace(30).await;
        assert_waited(started, Duration::from_secs(50));
        assert_eq!(pacer.tokens_used(), 0);
    }
}
