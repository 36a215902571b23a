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

//! Wrapper that the upstream service puts around every response payload.

use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Response from the upstream service on a successful request.
#[derive(Deserialize)]
struct Envelope<T> {
    /// The payload of the response.
    data: T,

    /// Human-readable description of the outcome, if any.
    status: Option<String>,
}

/// Decodes the raw `bytes` of an upstream response and extracts its payload.
pub(super) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    let envelope: Envelope<T> = serde_json::from_slice(bytes)?;
    if let Some(status) = envelope.status {
        debug!("Upstream reported status: {}", status);
    }
    Ok(envelope.data)
}
