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

//! Operations on one employee.

use crate::driver::Driver;
use crate::model::{Employee, EmployeeId, NewEmployee};
use log::info;
use roster_core::driver::DriverResult;
use roster_core::model::ModelError;

impl Driver {
    /// Gets the employee identified by `id`.
    pub(crate) async fn get_by_id(self, id: &EmployeeId) -> DriverResult<Option<Employee>> {
        Ok(self.api.fetch_by_id(id).await?)
    }

    /// Creates a new employee from untrusted fields and returns the record as stored by the
    /// upstream service.
    ///
    /// The fields are validated before talking to the upstream service, and missing numeric
    /// fields are reported like any other invalid input.
    pub(crate) async fn create(
        self,
        name: String,
        salary: Option<i64>,
        age: Option<i64>,
        title: String,
    ) -> DriverResult<Option<Employee>> {
        let salary = salary.ok_or_else(|| ModelError("Salary is mandatory".to_owned()))?;
        let age = age.ok_or_else(|| ModelError("Age is mandatory".to_owned()))?;
        let new = NewEmployee::new(name, salary, age, title)?;
        Ok(self.api.create(&new).await?)
    }

    /// Deletes the employee identified by `id` and returns its name.
    ///
    /// The upstream service can only delete by name, so this first resolves the name of the
    /// employee and then deletes by that name.  The two steps are not atomic: the record may
    /// change in between, and any other employee with the same name is deleted as well.
    pub(crate) async fn delete_by_id(self, id: &EmployeeId) -> DriverResult<Option<String>> {
        let employee = match self.api.fetch_by_id(id).await? {
            Some(employee) => employee,
            None => {
                info!("Not deleting employee {} because it does not exist", id.as_str());
                return Ok(None);
            }
        };
        Ok(self.api.delete_by_name(employee.name()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use crate::upstream::mock::MockFailure;
    use roster_core::driver::DriverError;

    #[tokio::test]
    async fn test_get_by_id_ok() {
        let context = TestContext::setup();
        let fred = Employee::new("1", "fred", 1000).with_title("Mechanic");
        context.api().add(Employee::new("2", "wilma", 2000)).await;
        context.api().add(fred.clone()).await;

        assert_eq!(Some(fred), context.driver().get_by_id(&EmployeeId::from("1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let context = TestContext::setup();
        context.api().add(Employee::new("2", "wilma", 2000)).await;

        assert_eq!(None, context.driver().get_by_id(&EmployeeId::from("1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_rate_limited() {
        let context = TestContext::setup();
        context.api().inject_failure("fetch_by_id", MockFailure::RateLimited).await;

        match context.driver().get_by_id(&EmployeeId::from("1")).await {
            Err(DriverError::RateLimited(_)) => (),
            e => panic!("{:?}", e),
        }
    }

    /// Creates "Sam" through the driver with valid fields.
    async fn create_sam(context: &TestContext) -> DriverResult<Option<Employee>> {
        let driver = context.driver();
        driver.create("Sam".to_owned(), Some(1500), Some(23), "Babysitter".to_owned()).await
    }

    #[tokio::test]
    async fn test_create_ok() {
        let context = TestContext::setup();

        let employee = create_sam(&context).await.unwrap().unwrap();
        assert_eq!("Sam", employee.name());
        assert_eq!(1500, *employee.salary());
        assert_eq!(Some(23), *employee.age());
        assert_eq!("Babysitter", employee.title());

        assert_eq!(vec![employee], context.api().employees().await);
    }

    #[tokio::test]
    async fn test_create_unavailable() {
        let context = TestContext::setup();
        context.api().inject_failure("create", MockFailure::Unavailable).await;

        assert_eq!(None, create_sam(&context).await.unwrap());
        assert!(context.api().employees().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_get_by_id_round_trip() {
        let context = TestContext::setup();

        let created = create_sam(&context).await.unwrap().unwrap();
        let fetched = context.driver().get_by_id(created.id()).await.unwrap().unwrap();

        assert_eq!(created, fetched);
        assert_eq!("Sam", fetched.name());
        assert_eq!(1500, *fetched.salary());
        assert_eq!(Some(23), *fetched.age());
        assert_eq!("Babysitter", fetched.title());
    }

    #[tokio::test]
    async fn test_create_invalid_input_does_not_reach_upstream() {
        for (name, salary, age, title, exp_error) in [
            ("Sam", None, Some(23), "Babysitter", "Salary is mandatory"),
            ("Sam", Some(1500), None, "Babysitter", "Age is mandatory"),
            ("", Some(1500), Some(23), "Babysitter", "Name is mandatory"),
            ("Sam", Some(-1), Some(23), "Babysitter", "Salary must be positive"),
            ("Sam", Some(1500), Some(80), "Babysitter", "Age must be 75 or under"),
            ("Sam", Some(1500), Some(23), " ", "Title is mandatory"),
        ] {
            let context = TestContext::setup();

            assert_eq!(
                DriverError::InvalidInput(exp_error.to_owned()),
                context
                    .driver()
                    .create(name.to_owned(), salary, age, title.to_owned())
                    .await
                    .unwrap_err()
            );
            assert!(context.api().calls().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_delete_by_id_ok() {
        let context = TestContext::setup();
        context.api().add(Employee::new("1", "fred", 1000)).await;
        context.api().add(Employee::new("2", "wilma", 2000)).await;

        assert_eq!(
            Some("fred".to_owned()),
            context.driver().delete_by_id(&EmployeeId::from("1")).await.unwrap()
        );

        assert_eq!(vec!["fetch_by_id 1", "delete_by_name fred"], context.api().calls().await);
        assert_eq!(vec![Employee::new("2", "wilma", 2000)], context.api().employees().await);
    }

    #[tokio::test]
    async fn test_delete_by_id_not_found_skips_delete() {
        let context = TestContext::setup();
        context.api().add(Employee::new("2", "wilma", 2000)).await;

        assert_eq!(None, context.driver().delete_by_id(&EmployeeId::from("1")).await.unwrap());

        assert_eq!(vec!["fetch_by_id 1"], context.api().calls().await);
    }

    #[tokio::test]
    async fn test_delete_by_id_removes_namesakes() {
        let context = TestContext::setup();
        context.api().add(Employee::new("1", "fred", 1000)).await;
        context.api().add(Employee::new("2", "fred", 2000)).await;

        context.driver().delete_by_id(&EmployeeId::from("2")).await.unwrap();

        assert!(context.api().employees().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_id_delete_fails() {
        let context = TestContext::setup();
        context.api().add(Employee::new("1", "fred", 1000)).await;
        context.api().inject_failure("delete_by_name", MockFailure::Unavailable).await;

        assert_eq!(None, context.driver().delete_by_id(&EmployeeId::from("1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_id_rate_limited_on_delete() {
        let context = TestContext::setup();
        context.api().add(Employee::new("1", "fred", 1000)).await;
        context.api().inject_failure("delete_by_name", MockFailure::RateLimited).await;

        match context.driver().delete_by_id(&EmployeeId::from("1")).await {
            Err(DriverError::RateLimited(_)) => (),
            e => panic!("{:?}", e),
        }
    }
}
