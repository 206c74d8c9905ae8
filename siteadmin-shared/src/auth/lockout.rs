/// Login attempt tracking and lockout
///
/// Keeps an append-only log of login attempts per email and answers one
/// question: how many failures happened inside the rolling window? An email
/// with `max_failures` or more recent failures is locked. Nothing unlocks an
/// account explicitly; failures age out of the window, or a successful
/// login clears the whole log.
///
/// Every method takes `now` explicitly, which keeps the window arithmetic
/// testable without sleeping.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use siteadmin_shared::auth::lockout::LoginAttemptTracker;
/// use siteadmin_shared::models::user::LoginAttempt;
///
/// let mut tracker = LoginAttemptTracker::new(5, Duration::minutes(30));
/// let now = Utc::now();
/// for _ in 0..5 {
///     tracker.record(LoginAttempt::failed("a@example.com", None, now));
/// }
/// assert!(tracker.is_locked("a@example.com", now));
/// assert!(!tracker.is_locked("a@example.com", now + Duration::minutes(31)));
/// ```
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::user::LoginAttempt;

/// Default number of recent failures that locks an account
pub const DEFAULT_MAX_FAILURES: usize = 5;

/// Default rolling window length in minutes
pub const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// Per-email sliding-window failure counter
#[derive(Debug, Clone)]
pub struct LoginAttemptTracker {
    attempts: HashMap<String, Vec<LoginAttempt>>,
    max_failures: usize,
    window: Duration,
}

impl Default for LoginAttemptTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FAILURES, Duration::minutes(DEFAULT_WINDOW_MINUTES))
    }
}

impl LoginAttemptTracker {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            attempts: HashMap::new(),
            max_failures,
            window,
        }
    }

    /// Failure threshold this tracker locks at
    pub fn max_failures(&self) -> usize {
        self.max_failures
    }

    /// Appends an attempt to the log for its email
    pub fn record(&mut self, attempt: LoginAttempt) {
        self.attempts
            .entry(normalize(&attempt.email))
            .or_default()
            .push(attempt);
    }

    /// Drops the entire log for `email`, not only the recent part
    pub fn clear(&mut self, email: &str) {
        self.attempts.remove(&normalize(email));
    }

    /// Full attempt log for `email`, oldest first
    pub fn attempts(&self, email: &str) -> &[LoginAttempt] {
        self.attempts
            .get(&normalize(email))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Failures strictly newer than `now - window`, oldest first
    fn recent_failure_times(&self, email: &str, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let cutoff = now - self.window;
        let mut times: Vec<DateTime<Utc>> = self
            .attempts(email)
            .iter()
            .filter(|a| !a.success && a.attempted_at > cutoff)
            .map(|a| a.attempted_at)
            .collect();
        times.sort();
        times
    }

    /// Number of failures inside the window
    pub fn recent_failures(&self, email: &str, now: DateTime<Utc>) -> usize {
        self.recent_failure_times(email, now).len()
    }

    /// Whether `email` has reached the failure threshold
    pub fn is_locked(&self, email: &str, now: DateTime<Utc>) -> bool {
        self.recent_failures(email, now) >= self.max_failures
    }

    /// Failures left before the account locks
    pub fn remaining_attempts(&self, email: &str, now: DateTime<Utc>) -> usize {
        self.max_failures
            .saturating_sub(self.recent_failures(email, now))
    }

    /// Time until enough failures age out to unlock, `None` when not locked
    pub fn retry_after(&self, email: &str, now: DateTime<Utc>) -> Option<Duration> {
        let times = self.recent_failure_times(email, now);
        if times.len() < self.max_failures {
            return None;
        }

        // The account unlocks once only max_failures - 1 failures remain.
        let unlocking = times[times.len() - self.max_failures];
        Some(unlocking + self.window - now)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
