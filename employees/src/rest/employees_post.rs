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

//! API to create a new employee.

use crate::driver::Driver;
use axum::Json;
use axum::extract::State;
use axum::http;
use axum::response::IntoResponse;
use roster_core::rest::RestError;
use serde::{Deserialize, Serialize};

/// Message sent by the client to create an employee.
///
/// All fields are optional at this level so that the business layer reports missing fields with
/// the same messages as invalid ones.
#[derive(Default, Deserialize, Serialize)]
pub(crate) struct CreateEmployeeRequest {
    /// Full name of the employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,

    /// Yearly salary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) salary: Option<i64>,

    /// Age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) age: Option<i64>,

    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,
}

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Json(request): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, RestError> {
    let name = request.name.unwrap_or_default();
    let title = request.title.unwrap_or_default();
    match driver.create(name, request.salary, request.age, title).await? {
        Some(employee) => Ok((http::StatusCode::CREATED, Json(employee))),
        None => Err(RestError::InternalError("Failed to create employee".to_owned())),
    }
}
