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

//! Fake upstream HTTP server to exercise the real client against scripted responses.

use axum::Router;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use futures::lock::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// A scripted response for the fake upstream to return.
pub(crate) struct FakeResponse {
    /// Status code of the response.
    status: StatusCode,

    /// Raw body of the response.
    body: String,
}

impl FakeResponse {
    /// Creates a new scripted response with `status` and `body`.
    pub(crate) fn new<B: Into<String>>(status: StatusCode, body: B) -> Self {
        Self { status, body: body.into() }
    }
}

/// A request received by the fake upstream.
#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    /// HTTP method of the request.
    pub(crate) method: String,

    /// Path of the request, without the query.
    pub(crate) path: String,

    /// Value of the content type header, if any.
    pub(crate) content_type: Option<String>,

    /// Raw body of the request.
    pub(crate) body: String,
}

/// State shared between the fake upstream and its handle.
struct FakeState {
    /// Responses still to be returned, front first.
    responses: VecDeque<FakeResponse>,

    /// Requests received so far.
    requests: Vec<RecordedRequest>,
}

/// Handler for every request that the fake upstream receives.
async fn handle(
    State(state): State<Arc<Mutex<FakeState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let mut state = state.lock().await;
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body,
    });
    match state.responses.pop_front() {
        Some(response) => {
            (response.status, [(CONTENT_TYPE, "application/json")], response.body).into_response()
        }
        None => (StatusCode::INTERNAL_SERVER_ERROR, "No more scripted responses").into_response(),
    }
}

/// A fake upstream service listening on a random local port.
pub(crate) struct FakeUpstream {
    /// Address the server is listening on.
    addr: SocketAddr,

    /// State shared with the server.
    state: Arc<Mutex<FakeState>>,

    /// Handle to the task running the server.
    server: JoinHandle<()>,
}

impl FakeUpstream {
    /// Starts a new fake upstream that returns `responses` in order.
    pub(crate) async fn start(responses: Vec<FakeResponse>) -> Self {
        let state = Arc::from(Mutex::from(FakeState {
            responses: VecDeque::from(responses),
            requests: vec![],
        }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state, server }
    }

    /// Returns the base URL of the employee collection in this fake upstream.
    pub(crate) fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api/v1/employee", self.addr)).unwrap()
    }

    /// Returns the requests received so far.
    pub(crate) async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }

    /// Stops the server so that further connections are refused.
    pub(crate) async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }
}
