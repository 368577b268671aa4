//! Retry Policy (C4): exponential-backoff retry with bounded attempts and
//! pluggable retriable/fatal classification.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

/// How [`retry_async`] should treat a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Retriable,
    Fatal,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub operation_name: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            operation_name: "operation".to_string(),
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    /// Delay for attempt *k* (1-indexed): `base * 2^(k-1)`, capped at
    /// `max_delay`, with +/-20% jitter (§4.4).
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let unjittered = self.base_delay.saturating_mul(2u32.saturating_pow(exponent)).min(self.max_delay);

        let jitter_fraction = rand::thread_rng().gen_range(-0.2..=0.2);
        let jittered_secs = unjittered.as_secs_f64() * (1.0 + jitter_fraction);
        Duration::from_secs_f64(jittered_secs.max(0.0))
    }
}

#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success(T),
    Exhausted { error: E, attempts: u32 },
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, RetryOutcome::Success(_))
    }
}

/// Runs `operation` up to `config.max_attempts` times. Between attempts,
/// `classify` decides whether a failure is worth retrying; a `Fatal`
/// classification stops immediately without exhausting the attempt budget.
pub async fn retry_async<F, Fut, T, E, C>(config: &RetryConfig, classify: C, operation: F) -> RetryOutcome<T, E>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> Classification,
    E: fmt::Display,
{
    let mut last_error = None;

    for attempt in 1..=config.max_attempts {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = %config.operation_name, attempt, "retry succeeded");
                }
                return RetryOutcome::Success(value);
            },
            Err(error) => {
                let classification = classify(&error);
                warn!(
                    operation = %config.operation_name,
                    attempt,
                    max_attempts = config.max_attempts,
                    error = %error,
                    ?classification,
                    "operation attempt failed"
                );

                if classification == Classification::Fatal {
                    return RetryOutcome::Exhausted { error, attempts: attempt };
                }

                last_error = Some(error);

                if attempt < config.max_attempts {
                    let delay = config.delay_for_attempt(attempt);
                    tokio::time::sleep(delay).await;
                }
            },
        }
    }

    RetryOutcome::Exhausted {
        error: last_error.expect("loop runs at least once so an error was recorded"),
        attempts: config.max_attempts,
    }
}
