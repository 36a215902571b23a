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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;

mod employee_delete;
mod employee_get;
mod employees_get;
mod employees_post;
mod employees_search_get;
mod highest_salary_get;
#[cfg(test)]
mod testutils;
mod top_earners_get;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;
    Router::new()
        .route("/api/v1/employee", get(employees_get::handler).post(employees_post::handler))
        .route("/api/v1/employee/search/:query", get(employees_search_get::handler))
        .route("/api/v1/employee/highestSalary", get(highest_salary_get::handler))
        .route("/api/v1/employee/topTenHighestEarningEmployeeNames", get(top_earners_get::handler))
        .route(
            "/api/v1/employee/:id",
            get(employee_get::handler).delete(employee_delete::handler),
        )
        .with_state(driver)
}
