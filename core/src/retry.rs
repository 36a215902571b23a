// Roster
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Retry policies with exponential backoff for calls to unreliable services.

use crate::clocks::Clock;
use log::warn;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts, including the first one, for a single call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay to wait after the first failed attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(3000);

/// Default factor by which the delay grows after every failed attempt.
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// Describes how many times to attempt a call and how long to wait in between attempts.
///
/// The decision of which errors are worth retrying is not part of the policy: it is supplied by
/// the caller of `run` because only the caller knows its error type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one.  Always at least 1.
    max_attempts: u32,

    /// Delay to wait after the first failed attempt.
    initial_delay: Duration,

    /// Factor by which the delay grows after every failed attempt.  Always at least 1.
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates a new policy after validating its parameters.
    pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: u32) -> Result<Self, String> {
        if max_attempts == 0 {
            return Err("Retry policy must allow at least one attempt".to_owned());
        }
        if multiplier == 0 {
            return Err("Retry policy multiplier must be at least 1".to_owned());
        }
        Ok(Self { max_attempts, initial_delay, multiplier })
    }

    /// Returns the maximum number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay to wait after the failed attempt number `attempt`, which is 1-based.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        assert!(attempt > 0, "Attempt numbers start at 1");
        let factor = self.multiplier.saturating_pow(attempt - 1);
        self.initial_delay.saturating_mul(factor)
    }

    /// Runs `op` until it succeeds, until it fails with an error for which `is_retryable` returns
    /// false, or until the maximum number of attempts is reached.  Waits between attempts happen
    /// via `clock`.
    ///
    /// Returns the result of the last attempt.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        clock: &(dyn Clock + Send + Sync),
        is_retryable: P,
        mut op: F,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1;
        loop {
            let delay = match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        "Attempt {} of {} failed: {}; retrying in {}ms",
                        attempt,
                        self.max_attempts,
                        e,
                        delay.as_millis()
                    );
                    delay
                }
                Err(e) => return Err(e),
            };
            clock.sleep(delay).await;
            attempt += 1;
        }
    }
}
