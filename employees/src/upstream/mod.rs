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

//! Access to the upstream employee service, which is the source of truth for all records.
//!
//! The upstream service is unreliable: it throttles callers with 429 responses and may fail in
//! other ways.  Implementations of `EmployeeApi` absorb every failure except persistent
//! throttling, which they report as `UpstreamError::RateLimitExhausted` once retries run out.
//! Every other failure collapses into `None` so that higher layers can decide what absence means.

use crate::model::{Employee, EmployeeId, NewEmployee};
use async_trait::async_trait;
use roster_core::driver::DriverError;

mod client;
mod envelope;
pub(crate) use client::HttpEmployeeApi;
pub use client::UpstreamOptions;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
pub(crate) mod testutils;

/// Errors that an upstream call can surface to its caller.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum UpstreamError {
    /// The upstream service kept returning 429 until all attempts were consumed.
    #[error("Upstream service still throttling after {0} attempts")]
    RateLimitExhausted(u32),
}

impl From<UpstreamError> for DriverError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::RateLimitExhausted(_) => DriverError::RateLimited(e.to_string()),
        }
    }
}

/// Result type for this module.
pub(crate) type UpstreamResult<T> = Result<T, UpstreamError>;

/// Interface to the upstream employee service.
///
/// A `None` return value means that the data is not available, which covers records that do not
/// exist as well as any upstream failure other than persistent throttling.
#[async_trait]
pub(crate) trait EmployeeApi {
    /// Fetches every employee known to the upstream service.
    async fn fetch_all(&self) -> UpstreamResult<Option<Vec<Employee>>>;

    /// Fetches the employee identified by `id`.
    async fn fetch_by_id(&self, id: &EmployeeId) -> UpstreamResult<Option<Employee>>;

    /// Asks the upstream service to create `new` and returns the record it created.
    async fn create(&self, new: &NewEmployee) -> UpstreamResult<Option<Employee>>;

    /// Deletes the employee named `name` and returns that same name on success.
    ///
    /// The upstream service only supports deletions by name, so all employees sharing the name
    /// may be affected.
    async fn delete_by_name(&self, name: &str) -> UpstreamResult<Option<String>>;
}
