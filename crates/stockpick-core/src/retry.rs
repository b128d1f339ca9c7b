//! Transport retry policy for the HTTP search source.
//!
//! Retrying is the transport's job: the session surfaces a failed page once
//! and waits for the user to ask again.

use std::time::Duration;

use crate::HttpError;

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * factor^attempt`, capped at `max`, optionally spread by +/- 50%.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(150),
            factor: 2.0,
            max: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let seconds = (base.as_secs_f64() * factor.powi(exponent)).min(max.as_secs_f64());
                let delay = Duration::from_secs_f64(seconds);
                if !jitter {
                    return delay;
                }

                let half = delay.as_millis() as u64 / 2;
                let spread = fastrand::u64(0..=half * 2);
                Duration::from_millis((delay.as_millis() as u64 + spread).saturating_sub(half))
            }
        }
    }
}

/// When and how often a failed page request is re-sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt; `0` disables retrying.
    pub max_retries: u32,
    pub backoff: Backoff,
    pub retry_on_status: Vec<u16>,
    pub retry_on_timeout: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::default(),
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
        }
    }
}

impl RetryConfig {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn fixed(delay: Duration, max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Fixed(delay),
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn should_retry_error(&self, error: &HttpError) -> bool {
        if error.is_timeout() {
            return self.retry_on_timeout;
        }
        error.retryable()
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_doubles_until_capped() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_millis(500),
            jitter: false,
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(100));
        assert_eq!(backoff.delay(1), Duration::from_millis(200));
        assert_eq!(backoff.delay(2), Duration::from_millis(400));
        assert_eq!(backoff.delay(3), Duration::from_millis(500));
    }

    #[test]
    fn jitter_stays_within_half_of_the_delay() {
        let backoff = Backoff::Exponential {
            base: Duration::from_millis(200),
            factor: 1.0,
            max: Duration::from_secs(1),
            jitter: true,
        };

        for _ in 0..50 {
            let delay = backoff.delay(0).as_millis();
            assert!((100..=300).contains(&delay), "delay_ms={delay}");
        }
    }

    #[test]
    fn default_policy_retries_transient_failures_only() {
        let config = RetryConfig::default();

        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(config.should_retry_error(&HttpError::Timeout(String::from("slow"))));
        assert!(!config.should_retry_error(&HttpError::Rejected(String::from("bad url"))));
    }

    #[test]
    fn fixed_and_disabled_policies() {
        let config = RetryConfig::fixed(Duration::from_millis(50), 3);
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(50));
        assert_eq!(RetryConfig::no_retry().max_retries, 0);
    }
}
