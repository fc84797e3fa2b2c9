//! Adaptive request pacing
//!
//! This module keeps per-session cadence counters and computes a layered,
//! jittered delay before every remote call so the request pattern stays close
//! to a human browsing rhythm:
//! - a random base delay on every request
//! - longer rests every 5th and 10th request
//! - an anti-burst penalty when requests come back to back
//! - a fatigue penalty once the session has run long
//!
//! Failures and batch boundaries get their own cooldowns. The random source
//! is injectable and the delay computation is separate from the sleep, so
//! tests assert on computed magnitudes instead of wall-clock time.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Gap between requests (seconds) under which the anti-burst penalty applies
const BURST_WINDOW_SECS: f64 = 2.0;

/// Session age (seconds) past which the fatigue penalty applies
const FATIGUE_AFTER_SECS: f64 = 1800.0;

/// Per-session pacing state
///
/// One pacer lives for the duration of a scraping session and is threaded by
/// mutable reference through every paced call. Counters are never persisted
/// across sessions.
pub struct Pacer {
    enabled: bool,

    /// Monotonic count of paced requests this session
    request_count: u64,

    /// Completion time of the most recent paced request
    last_request_time: Option<Instant>,

    /// When this session began, for the fatigue penalty
    session_start: Instant,

    rng: Box<dyn RngCore + Send>,
}

impl Pacer {
    /// Creates a pacer backed by an entropy-seeded random source
    pub fn new(enabled: bool) -> Self {
        Self::with_rng(enabled, StdRng::from_entropy())
    }

    /// Creates a pacer with an injected random source
    ///
    /// Seeded sources make the delay sequence deterministic for tests.
    pub fn with_rng<R>(enabled: bool, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            enabled,
            request_count: 0,
            last_request_time: None,
            session_start: Instant::now(),
            rng: Box::new(rng),
        }
    }

    /// Whether pacing delays are active for this session
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Number of paced requests so far
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..=high)
    }

    /// Computes the delay for the next request and advances the counter
    ///
    /// Layered on top of a 1-3s base: every 10th request takes a 5-10s long
    /// rest, every other 5th a 2-5s medium rest (the long rest supersedes the
    /// medium one); requests arriving within 2s of the previous one pay an
    /// extra 1-3s; sessions older than 30 minutes pay an extra 2-5s.
    fn request_delay(&mut self, now: Instant) -> Duration {
        self.request_count += 1;

        let mut delay = self.uniform(1.0, 3.0);

        if self.request_count % 10 == 0 {
            let rest = self.uniform(5.0, 10.0);
            tracing::debug!(
                "long rest after {} requests: +{:.1}s",
                self.request_count,
                rest
            );
            delay += rest;
        } else if self.request_count % 5 == 0 {
            delay += self.uniform(2.0, 5.0);
        }

        if let Some(last) = self.last_request_time {
            if now.duration_since(last).as_secs_f64() < BURST_WINDOW_SECS {
                delay += self.uniform(1.0, 3.0);
            }
        }

        if now.duration_since(self.session_start).as_secs_f64() > FATIGUE_AFTER_SECS {
            delay += self.uniform(2.0, 5.0);
        }

        Duration::from_secs_f64(delay)
    }

    fn failure_delay(&mut self) -> Duration {
        Duration::from_secs_f64(self.uniform(5.0, 10.0))
    }

    fn batch_delay(&mut self) -> Duration {
        Duration::from_secs_f64(self.uniform(3.0, 7.0))
    }

    /// Suspends the caller before a remote call
    ///
    /// Returns immediately when pacing is disabled. Otherwise sleeps for the
    /// computed delay and stamps the completion time.
    pub async fn before_request(&mut self) {
        if !self.enabled {
            return;
        }

        let delay = self.request_delay(Instant::now());
        tracing::debug!(
            "pacing request {}: sleeping {:.1}s",
            self.request_count,
            delay.as_secs_f64()
        );
        sleep(delay).await;
        self.last_request_time = Some(Instant::now());
    }

    /// Cooldown after an observed remote failure
    ///
    /// Does not advance the request counter; a failed call still backs the
    /// session off.
    pub async fn after_failure(&mut self) {
        if !self.enabled {
            return;
        }

        let delay = self.failure_delay();
        tracing::debug!("failure cooldown: sleeping {:.1}s", delay.as_secs_f64());
        sleep(delay).await;
    }

    /// Longer pause between top-level seed accounts during a multi-account
    /// traversal
    pub async fn after_batch(&mut self) {
        if !self.enabled {
            return;
        }

        let delay = self.batch_delay();
        tracing::debug!("batch rest: sleeping {:.1}s", delay.as_secs_f64());
        sleep(delay).await;
    }
}
