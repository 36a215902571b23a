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

//! REST service that fronts an unreliable upstream employee API.
//!
//! The upstream service is the source of truth for all records.  This service retries throttled
//! upstream calls, derives aggregate views (searches, salary extremes and rankings) from the full
//! collection of employees, and validates new records before they reach the upstream service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use roster_core::clocks::SystemClock;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;
mod upstream;
use upstream::HttpEmployeeApi;
pub use upstream::UpstreamOptions;

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    upstream_opts: UpstreamOptions,
) -> Result<(), Box<dyn Error>> {
    let api = HttpEmployeeApi::new(upstream_opts, Arc::new(SystemClock::default()))?;
    let driver = Driver::new(Arc::new(api));
    let app = app(driver);

    let listener = TcpListener::bind(bind_addr.into()).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
