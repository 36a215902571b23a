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

//! API to get all employees.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::http;
use axum::response::{IntoResponse, Response};
use roster_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    _: EmptyBody,
) -> Result<Response, RestError> {
    match driver.get_all().await? {
        Some(employees) if employees.is_empty() => Ok(http::StatusCode::NO_CONTENT.into_response()),
        Some(employees) => Ok(Json(employees).into_response()),
        None => Err(RestError::InternalError("Failed to fetch employees".to_owned())),
    }
}
