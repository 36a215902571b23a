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

//! Business logic for the service.

use crate::upstream::EmployeeApi;
use std::sync::Arc;

mod employee;
mod employees;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": each of them issues its own
/// upstream requests and never reuses data fetched by a previous operation.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of chaining two
/// operations on stale data.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The upstream service that holds the employee records.
    api: Arc<dyn EmployeeApi + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(api: Arc<dyn EmployeeApi + Send + Sync>) -> Self {
        Self { api }
    }
}
