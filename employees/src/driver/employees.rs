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

//! Operations on the whole collection of employees.

use crate::driver::Driver;
use crate::model::Employee;
use log::info;
use roster_core::driver::DriverResult;

/// Maximum number of names returned by `get_top_ten_earner_names`.
const TOP_EARNERS: usize = 10;

impl Driver {
    /// Gets all employees known to the upstream service.
    ///
    /// Returns `None` if the collection could not be fetched, which is different from an empty
    /// collection.
    pub(crate) async fn get_all(self) -> DriverResult<Option<Vec<Employee>>> {
        Ok(self.api.fetch_all().await?)
    }

    /// Gets all employees whose name contains `query`, ignoring case, in upstream order.
    pub(crate) async fn search_by_name(self, query: &str) -> DriverResult<Option<Vec<Employee>>> {
        let query = query.to_lowercase();
        let employees = match self.api.fetch_all().await? {
            Some(employees) => employees,
            None => return Ok(None),
        };
        let matches: Vec<Employee> = employees
            .into_iter()
            .filter(|e| e.name().to_lowercase().contains(&query))
            .collect();
        info!("Search for '{}' matched {} employees", query, matches.len());
        Ok(Some(matches))
    }

    /// Gets the highest salary among all employees, if there are any.
    pub(crate) async fn get_highest_salary(self) -> DriverResult<Option<i64>> {
        let employees = self.api.fetch_all().await?;
        Ok(employees.and_then(|employees| employees.iter().map(|e| *e.salary()).max()))
    }

    /// Gets the names of the ten best-paid employees, best first.
    ///
    /// Employees with equal salaries keep their upstream order.  The result is empty when the
    /// collection could not be fetched.
    pub(crate) async fn get_top_ten_earner_names(self) -> DriverResult<Vec<String>> {
        let mut employees = self.api.fetch_all().await?.unwrap_or_default();
        employees.sort_by(|a, b| b.salary().cmp(a.salary()));
        Ok(employees.into_iter().take(TOP_EARNERS).map(|e| e.name().to_owned()).collect())
    }
}
