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

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in this module that returns the `Router` for the
//! application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the upstream mocks directly, using simplified types.

use crate::driver::DriverError;
use async_trait::async_trait;
use axum::Json;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
///
/// Messages in these errors are returned to the client, so they must not carry details about
/// upstream failures: those belong in the logs.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates that we are being throttled and that the client should try again later.
    #[error("{0}")]
    TooManyRequests(String),
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::RateLimited(_) => {
                RestError::TooManyRequests("Too many requests; try again later".to_owned())
            }
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RestError::InternalError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => http::StatusCode::PAYLOAD_TOO_LARGE,
            RestError::TooManyRequests(_) => http::StatusCode::TOO_MANY_REQUESTS,
        };

        let response = ErrorResponse { message: self.to_string() };

        (status, Json(response)).into_response()
    }
}

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    /// Textual representation of the error message.
    pub(crate) message: String,
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Helpers to exercise a `Router` in tests without going through the network.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{self, HeaderName, HeaderValue};
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    /// Upper bound on the size of the response bodies that tests read.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the app under test.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// The request being built.
        request: http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            Self { app, request: Request::builder().method(method).uri(uri.as_ref()) }
        }

        /// Adds a header `name` with `value` to the request.  Headers added this way take
        /// precedence over the ones that the `send_*` methods add.
        pub fn with_header(mut self, name: HeaderName, value: &'static str) -> Self {
            self.request = self.request.header(name, HeaderValue::from_static(value));
            self
        }

        /// Sends the request with `body` and captures the response.
        async fn send(self, content_type: Option<mime::Mime>, body: Body) -> ResponseChecker {
            let mut request = self.request;
            if let Some(content_type) = content_type {
                request = request.header(http::header::CONTENT_TYPE, content_type.as_ref());
            }
            let response = self.app.oneshot(request.body(body).unwrap()).await.unwrap();
            ResponseChecker { response, exp_status: http::StatusCode::OK }
        }

        /// Sends the request without a payload.
        pub async fn send_empty(self) -> ResponseChecker {
            self.send(None, Body::empty()).await
        }

        /// Sends the request with a plain text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            self.send(Some(mime::TEXT_PLAIN), Body::from(text.into())).await
        }

        /// Sends the request with `payload` serialized as JSON.
        pub async fn send_json<T: Serialize>(self, payload: T) -> ResponseChecker {
            let body = serde_json::to_vec(&payload).unwrap();
            self.send(Some(mime::APPLICATION_JSON), Body::from(body)).await
        }
    }

    /// Validator for the response to a request sent by a `OneShotBuilder`.
    ///
    /// The expected status defaults to 200 and every `expect_*` method checks it before looking
    /// at the body.
    #[must_use]
    pub struct ResponseChecker {
        /// Response returned by the app.
        response: http::Response<Body>,

        /// Status code that the response must have.
        exp_status: http::StatusCode,
    }

    impl ResponseChecker {
        /// Sets the expected HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Checks the status and returns the raw body of the response.
        async fn into_body(self) -> Vec<u8> {
            assert_eq!(self.exp_status, self.response.status());
            axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap().to_vec()
        }

        /// Expects the response to have no body.
        pub async fn expect_empty(self) {
            let body = self.into_body().await;
            assert!(body.is_empty(), "Body not empty; got {}", String::from_utf8_lossy(&body));
        }

        /// Expects the response to be an `ErrorResponse` whose message matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            let body = self.into_body().await;
            let response = serde_json::from_slice::<ErrorResponse>(&body).unwrap_or_else(|e| {
                panic!("Invalid error response {}: {}", String::from_utf8_lossy(&body), e)
            });
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                re.is_match(&response.message),
                "Error message '{}' does not match re '{}'",
                response.message,
                exp_re
            );
        }

        /// Expects the response to be a JSON document of type `T` and returns it.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            serde_json::from_slice(&self.into_body().await).unwrap()
        }

        /// Expects the response to be text, not an `ErrorResponse`, that matches `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            let body = String::from_utf8(self.into_body().await).unwrap();
            assert!(!body.contains("\"message\":"), "Use expect_error to validate errors");
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body '{}' does not match re '{}'", body, exp_re);
        }
    }

    /// Generates a test to verify that an API that expects JSON fails when it gets something else.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE)
                    .expect_text("Content-Type")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .with_header(axum::http::header::CONTENT_TYPE, "application/json")
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_text("expected ident")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;
}
