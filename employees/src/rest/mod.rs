// III-IV
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

//! REST interface for the employee directory.

use crate::driver::Driver;
use axum::Router;

mod employee_delete;
mod employee_get;
mod employee_put;
mod employees_get;
mod employees_post;
mod params;
#[cfg(test)]
mod testutils;

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/employees", get(employees_get::handler).post(employees_post::handler))
        .route(
            "/employees/:id",
            get(employee_get::handler).put(employee_put::handler).delete(employee_delete::handler),
        )
        .with_state(driver)
}
