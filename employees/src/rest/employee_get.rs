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

//! API to get the details of one employee.

use crate::driver::Driver;
use crate::model::{Employee, EmployeeId};
use crate::rest::params::ParamChecker;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use staffdir_core::rest::{EmptyBody, RestError};

/// GET handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    path: Result<Path<i64>, PathRejection>,
    _: EmptyBody,
) -> Result<Json<Employee>, RestError> {
    let Path(id) = path?;

    let mut checker = ParamChecker::new("getEmployeeById");
    let Some(id) = checker.check("id", EmployeeId::new(id)) else {
        return Err(checker.into_error());
    };

    let employee = driver.get_employee(id).await?;
    Ok(Json(employee))
}
