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

//! Employee API implementation backed by an in-memory list for testing purposes.

use crate::model::{Employee, EmployeeId, NewEmployee};
use crate::upstream::{EmployeeApi, UpstreamError, UpstreamResult};
use async_trait::async_trait;
use futures::lock::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Failures that can be injected into the operations of a `MockEmployeeApi`.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MockFailure {
    /// The operation behaves as if the upstream service failed in a non-throttling way.
    Unavailable,

    /// The operation behaves as if the upstream service throttled every attempt.
    RateLimited,
}

/// Mutable state of the mock.
#[derive(Default)]
struct MockState {
    /// Employees known to the fake upstream, in insertion order.
    employees: Vec<Employee>,

    /// Sequence number for the identifiers of newly-created employees.
    next_id: u32,

    /// Failures to inject, keyed by the name of the operation.
    failures: HashMap<&'static str, MockFailure>,

    /// Log of the operations that were invoked, with their arguments.
    calls: Vec<String>,
}

impl MockState {
    /// Records a call to `op` with a description of its `args` and returns the failure to
    /// inject into it, if any.
    fn enter(&mut self, op: &'static str, args: &str) -> Option<MockFailure> {
        if args.is_empty() {
            self.calls.push(op.to_owned());
        } else {
            self.calls.push(format!("{} {}", op, args));
        }
        self.failures.get(op).copied()
    }
}

/// Converts an injected `failure` into the result that a real upstream would have produced.
fn inject<T>(failure: MockFailure) -> UpstreamResult<Option<T>> {
    match failure {
        MockFailure::Unavailable => Ok(None),
        MockFailure::RateLimited => Err(UpstreamError::RateLimitExhausted(3)),
    }
}

/// Employee API that keeps its records in memory and supports failure injection.
#[derive(Clone, Default)]
pub(crate) struct MockEmployeeApi {
    /// State shared by all clones of the mock.
    state: Arc<Mutex<MockState>>,
}

impl MockEmployeeApi {
    /// Adds `employee` to the fake upstream.
    pub(crate) async fn add(&self, employee: Employee) {
        self.state.lock().await.employees.push(employee);
    }

    /// Makes every future call to the operation named `op` fail with `failure`.
    pub(crate) async fn inject_failure(&self, op: &'static str, failure: MockFailure) {
        self.state.lock().await.failures.insert(op, failure);
    }

    /// Returns the log of calls made so far.
    pub(crate) async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    /// Returns the employees currently known to the fake upstream.
    pub(crate) async fn employees(&self) -> Vec<Employee> {
        self.state.lock().await.employees.clone()
    }
}

#[async_trait]
impl EmployeeApi for MockEmployeeApi {
    async fn fetch_all(&self) -> UpstreamResult<Option<Vec<Employee>>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.enter("fetch_all", "") {
            return inject(failure);
        }
        Ok(Some(state.employees.clone()))
    }

    async fn fetch_by_id(&self, id: &EmployeeId) -> UpstreamResult<Option<Employee>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.enter("fetch_by_id", id.as_str()) {
            return inject(failure);
        }
        Ok(state.employees.iter().find(|e| e.id() == id).cloned())
    }

    async fn create(&self, new: &NewEmployee) -> UpstreamResult<Option<Employee>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.enter("create", new.name()) {
            return inject(failure);
        }
        state.next_id += 1;
        let id = EmployeeId::new(format!("generated-{}", state.next_id))
            .expect("Generated identifiers must be valid");
        let employee = Employee::from_new(id, new);
        state.employees.push(employee.clone());
        Ok(Some(employee))
    }

    async fn delete_by_name(&self, name: &str) -> UpstreamResult<Option<String>> {
        let mut state = self.state.lock().await;
        if let Some(failure) = state.enter("delete_by_name", name) {
            return inject(failure);
        }
        let before = state.employees.len();
        state.employees.retain(|e| e.name() != name);
        if state.employees.len() == before { Ok(None) } else { Ok(Some(name.to_owned())) }
    }
}
