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

//! Generic business logic for any service.
//!
//! Every service should implement its own `Driver` type.  In most cases, this type will be
//! parameterized on the upstream services it talks to, and as such the definition will look like
//! this:
//!
//! ```rust
//! use std::sync::Arc;
//! trait UpstreamApi {}
//!
//! #[derive(Clone)]
//! pub(crate) struct Driver {
//!     /// The upstream service that the driver gets its data from.
//!     api: Arc<dyn UpstreamApi + Send + Sync>,
//!
//!     // ... other fields here ...
//! }
//! ```
//!
//! Every operation implemented in the `Driver` should consume `self` because each operation is
//! meant to be a self-contained sequence of upstream calls.  Consuming `self` prevents the caller
//! from easily reusing the results of one operation in another, which would hide the fact that
//! the upstream data may have changed in between.
//!
//! Missing data is not an error at this layer: operations return `Option`s and leave it to the
//! REST layer to decide what absence means for each API.

use crate::model::ModelError;

/// Business logic errors.  These errors encompass upstream and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// Indicates an error in the input data.
    #[error("{0}")]
    InvalidInput(String),

    /// Indicates that an upstream service kept throttling us after all retries were exhausted.
    #[error("{0}")]
    RateLimited(String),
}

impl From<ModelError> for DriverError {
    fn from(e: ModelError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;
