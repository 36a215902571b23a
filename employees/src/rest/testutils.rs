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

//! Test utilities for the REST API.

use crate::driver::Driver;
use crate::model::Employee;
use crate::rest::app;
use crate::upstream::mock::MockEmployeeApi;
use axum::Router;
use std::sync::Arc;

pub(crate) struct TestContext {
    api: MockEmployeeApi,
    app: Router,
}

impl TestContext {
    pub(crate) fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let api = MockEmployeeApi::default();
        let driver = Driver::new(Arc::new(api.clone()));
        let app = app(driver);
        Self { api, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) fn api(&self) -> &MockEmployeeApi {
        &self.api
    }

    /// Populates the fake upstream with a small staff where two people tie on salary.
    pub(crate) async fn add_staff(&self) -> Vec<Employee> {
        let staff = vec![
            Employee::new("1", "Alice", 1000).with_title("Engineer"),
            Employee::new("2", "Bob", 3000).with_title("Manager"),
            Employee::new("3", "Cid", 3000).with_title("Director"),
        ];
        for employee in &staff {
            self.api.add(employee.clone()).await;
        }
        staff
    }
}
