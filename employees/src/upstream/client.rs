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

//! Employee API implementation backed by the upstream HTTP service.

use crate::model::{Employee, EmployeeId, NewEmployee};
use crate::upstream::envelope;
use crate::upstream::{EmployeeApi, UpstreamError, UpstreamResult};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_core::clocks::Clock;
use roster_core::env::{get_optional_var, get_required_var};
use roster_core::retry::{
    DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MULTIPLIER, RetryPolicy,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default maximum time to wait for a single upstream request to complete.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options to configure an `HttpEmployeeApi`.
#[derive(Clone, Debug)]
#[cfg_attr(test, derive(PartialEq))]
pub struct UpstreamOptions {
    /// Base URL of the employee collection in the upstream service.
    pub base_url: Url,

    /// How to retry requests that the upstream service throttles.
    pub retry: RetryPolicy,

    /// Maximum time to wait for a single request to complete.
    pub timeout: Duration,
}

impl UpstreamOptions {
    /// Creates a set of options from environment variables whose name is prefixed with the given
    /// `prefix`.
    ///
    /// This will use variables such as `<prefix>_BASE_URL`, `<prefix>_MAX_ATTEMPTS`,
    /// `<prefix>_INITIAL_BACKOFF` and `<prefix>_TIMEOUT`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let base_url = get_required_var::<Url>(prefix, "BASE_URL")?;
        if base_url.cannot_be_a_base() {
            return Err(format!("Invalid {}_BASE_URL: {} cannot be a base URL", prefix, base_url));
        }

        let max_attempts =
            get_optional_var::<u32>(prefix, "MAX_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let initial_backoff = get_optional_var::<Duration>(prefix, "INITIAL_BACKOFF")?
            .unwrap_or(DEFAULT_INITIAL_DELAY);
        let retry = RetryPolicy::new(max_attempts, initial_backoff, DEFAULT_MULTIPLIER)
            .map_err(|e| format!("Invalid {}_MAX_ATTEMPTS: {}", prefix, e))?;

        Ok(Self {
            base_url,
            retry,
            timeout: get_optional_var::<Duration>(prefix, "TIMEOUT")?.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

/// Outcome of a single failed attempt to talk to the upstream service.
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    /// The upstream service throttled the request.
    #[error("HTTP request was throttled with status 429")]
    RateLimited,

    /// The requested record does not exist.
    #[error("HTTP request returned status 404")]
    NotFound,

    /// The upstream service answered with an unexpected status.
    #[error("HTTP request returned status {0} with text '{1}'")]
    Status(StatusCode, String),

    /// The request could not be delivered or its response could not be read.
    #[error("{0}")]
    Transport(String),

    /// The response payload did not have the expected shape.
    #[error("Invalid response payload: {0}")]
    Decode(String),
}

/// Converts a `reqwest::Error` to an `AttemptError`.
fn reqwest_error_to_attempt_error(e: reqwest::Error) -> AttemptError {
    AttemptError::Transport(format!("{}", e))
}

/// Converts a `reqwest::Response` to an `AttemptError`.  The response should have a non-OK status.
async fn http_response_to_attempt_error(response: Response) -> AttemptError {
    let status = response.status();
    match status {
        StatusCode::TOO_MANY_REQUESTS => AttemptError::RateLimited,
        StatusCode::NOT_FOUND => AttemptError::NotFound,
        _ => match response.text().await {
            Ok(text) => AttemptError::Status(status, text),
            Err(e) => AttemptError::Status(status, format!("failed to get text due to {}", e)),
        },
    }
}

/// Attaches a JSON `body` to the request being built by `builder`.
fn with_json_body(builder: RequestBuilder, body: Vec<u8>) -> RequestBuilder {
    builder.header(CONTENT_TYPE, "application/json").body(body)
}

/// Request to the upstream service to delete employees by name.
#[derive(Serialize)]
struct DeleteRequest<'a> {
    /// Name of the employees to delete.
    name: &'a str,
}

/// Employee API that talks to the upstream service over HTTP and retries throttled requests.
#[derive(Clone)]
pub(crate) struct HttpEmployeeApi {
    /// Asynchronous HTTP client with which to issue the service requests.
    client: Client,

    /// Base URL of the employee collection.  Guaranteed to be usable as a base.
    base_url: Url,

    /// How to retry throttled requests.
    retry: RetryPolicy,

    /// The clock used to wait between attempts.
    clock: Arc<dyn Clock + Send + Sync>,
}

impl HttpEmployeeApi {
    /// Creates a new upstream client using `opts` for configuration and `clock` to wait between
    /// retries.
    pub(crate) fn new(
        opts: UpstreamOptions,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self, String> {
        if opts.base_url.cannot_be_a_base() {
            return Err(format!("Upstream URL {} cannot be a base URL", opts.base_url));
        }
        let client = Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client, base_url: opts.base_url, retry: opts.retry, clock })
    }

    /// Computes the URL of the single employee identified by `id`.
    fn employee_url(&self, id: &EmployeeId) -> Url {
        let mut url = self.base_url.clone();
        // Never fails because `new` rejects URLs that cannot be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    /// Sends a single request and decodes the payload of its response.
    async fn attempt<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AttemptError> {
        let response = request.send().await.map_err(reqwest_error_to_attempt_error)?;
        let status = response.status();
        debug!("Upstream responded with status {}", status);
        if !status.is_success() {
            return Err(http_response_to_attempt_error(response).await);
        }

        let bytes = response.bytes().await.map_err(reqwest_error_to_attempt_error)?;
        envelope::decode(&bytes).map_err(|e| AttemptError::Decode(e.to_string()))
    }

    /// Issues the request produced by `build`, retrying it while the upstream service throttles
    /// us, and folds the final outcome into an `UpstreamResult`.
    ///
    /// `what` describes the operation for logging purposes.
    async fn execute<T, B>(&self, what: &str, build: B) -> UpstreamResult<Option<T>>
    where
        T: DeserializeOwned + Send,
        B: Fn() -> RequestBuilder + Send + Sync,
    {
        let result = self
            .retry
            .run(
                &*self.clock,
                |e| matches!(e, AttemptError::RateLimited),
                || Self::attempt::<T>(build()),
            )
            .await;
        match result {
            Ok(data) => Ok(Some(data)),
            Err(AttemptError::RateLimited) => {
                warn!("{} still throttled after {} attempts", what, self.retry.max_attempts());
                Err(UpstreamError::RateLimitExhausted(self.retry.max_attempts()))
            }
            Err(AttemptError::NotFound) => {
                info!("{} found nothing", what);
                Ok(None)
            }
            Err(e) => {
                error!("{} failed: {}", what, e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl EmployeeApi for HttpEmployeeApi {
    async fn fetch_all(&self) -> UpstreamResult<Option<Vec<Employee>>> {
        info!("Fetching all employees from upstream");
        self.execute("Fetch of all employees", || self.client.get(self.base_url.clone())).await
    }

    async fn fetch_by_id(&self, id: &EmployeeId) -> UpstreamResult<Option<Employee>> {
        info!("Fetching employee {} from upstream", id.as_str());
        let url = self.employee_url(id);
        self.execute(&format!("Fetch of employee {}", id.as_str()), || {
            self.client.get(url.clone())
        })
        .await
    }

    async fn create(&self, new: &NewEmployee) -> UpstreamResult<Option<Employee>> {
        info!("Creating employee {} in upstream", new.name());
        let body = match serde_json::to_vec(new) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize employee {}: {}", new.name(), e);
                return Ok(None);
            }
        };
        self.execute(&format!("Creation of employee {}", new.name()), || {
            with_json_body(self.client.post(self.base_url.clone()), body.clone())
        })
        .await
    }

    async fn delete_by_name(&self, name: &str) -> UpstreamResult<Option<String>> {
        info!("Deleting employees named {} from upstream", name);
        let body = match serde_json::to_vec(&DeleteRequest { name }) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize deletion of {}: {}", name, e);
                return Ok(None);
            }
        };
        let deleted: Option<bool> = self
            .execute(&format!("Deletion of employees named {}", name), || {
                with_json_body(self.client.delete(self.base_url.clone()), body.clone())
            })
            .await?;
        match deleted {
            Some(true) => Ok(Some(name.to_owned())),
            Some(false) => {
                warn!("Upstream did not delete any employee named {}", name);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
