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

//! High-level data types.

use derive_getters::Getters;
use roster_core::model::{ModelError, ModelResult};
use serde::de::Visitor;
use serde::{Deserialize, Serialize};

/// Minimum salary accepted when creating an employee.
const MIN_SALARY: i64 = 1;

/// Minimum age accepted when creating an employee.
const MIN_AGE: i64 = 16;

/// Maximum age accepted when creating an employee.
const MAX_AGE: i64 = 75;

/// Newtype pattern for the identifiers that the upstream service assigns to employees.
///
/// Identifiers are opaque to us: the only thing we check is that they are not empty.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct EmployeeId(String);

impl EmployeeId {
    /// Creates a new identifier from an untrusted string `s`, making sure it is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        if s.is_empty() {
            return Err(ModelError("Employee identifier cannot be empty".to_owned()));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the identifier.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl From<&'static str> for EmployeeId {
    /// Creates a new identifier from a hardcoded string, which must be valid.
    fn from(id: &'static str) -> Self {
        EmployeeId::new(id).expect("Hardcoded identifiers must be valid")
    }
}

/// A deserialization visitor for an `EmployeeId`.
struct EmployeeIdVisitor;

impl Visitor<'_> for EmployeeIdVisitor {
    type Value = EmployeeId;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a non-empty string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        EmployeeId::new(v).map_err(|e| E::custom(e.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        EmployeeId::new(v).map_err(|e| E::custom(e.to_string()))
    }
}

impl<'de> Deserialize<'de> for EmployeeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_string(EmployeeIdVisitor)
    }
}

/// An employee as known by the upstream service.
///
/// The upstream service owns these records and is not trusted to enforce the constraints we
/// apply to `NewEmployee`, so records are decoded as they come.  The serialized field names match
/// those of the upstream service and are reused verbatim in our own responses.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub(crate) struct Employee {
    /// Identifier assigned by the upstream service.
    id: EmployeeId,

    /// Full name of the employee.
    #[serde(rename = "employee_name")]
    name: String,

    /// Yearly salary.
    #[serde(rename = "employee_salary")]
    salary: i64,

    /// Age in years, if known.
    #[serde(rename = "employee_age", default, skip_serializing_if = "Option::is_none")]
    age: Option<u32>,

    /// Job title.
    #[serde(rename = "employee_title", default)]
    title: String,

    /// Contact email, if known.
    #[serde(rename = "employee_email", default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

#[cfg(test)]
impl Employee {
    /// Creates a minimal employee for testing purposes.
    pub(crate) fn new(id: &'static str, name: &str, salary: i64) -> Self {
        Self {
            id: EmployeeId::from(id),
            name: name.to_owned(),
            salary,
            age: None,
            title: String::new(),
            email: None,
        }
    }

    /// Creates the employee that a cooperative upstream would return after creating `new`.
    pub(crate) fn from_new(id: EmployeeId, new: &NewEmployee) -> Self {
        Self {
            id,
            name: new.name.clone(),
            salary: new.salary,
            age: Some(new.age),
            title: new.title.clone(),
            email: None,
        }
    }

    /// Sets the age of the employee.
    pub(crate) fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the title of the employee.
    pub(crate) fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Sets the email of the employee.
    pub(crate) fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_owned());
        self
    }
}

/// A request to create a new employee.  Can only be constructed with valid data.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
pub(crate) struct NewEmployee {
    /// Full name of the employee.  Never blank.
    name: String,

    /// Yearly salary.  Always positive.
    salary: i64,

    /// Age in years, within the range accepted by the upstream service.
    age: u32,

    /// Job title.  Never blank.
    title: String,
}

impl NewEmployee {
    /// Creates a new employee request from untrusted values, making sure they are valid.
    pub(crate) fn new<N, T>(name: N, salary: i64, age: i64, title: T) -> ModelResult<Self>
    where
        N: Into<String>,
        T: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError("Name is mandatory".to_owned()));
        }

        if salary < MIN_SALARY {
            return Err(ModelError("Salary must be positive".to_owned()));
        }

        if age < MIN_AGE {
            return Err(ModelError(format!("Age must be {} or over", MIN_AGE)));
        }
        if age > MAX_AGE {
            return Err(ModelError(format!("Age must be {} or under", MAX_AGE)));
        }
        let age = u32::try_from(age).map_err(|e| ModelError(format!("Invalid age: {}", e)))?;

        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModelError("Title is mandatory".to_owned()));
        }

        Ok(Self { name, salary, age, title })
    }
}
