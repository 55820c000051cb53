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

//! API to move an employee to a different department and role.

use crate::driver::Driver;
use crate::model::{DepartmentId, Employee, EmployeeId, JobTitle};
use crate::rest::params::ParamChecker;
use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
#[cfg(test)]
use serde::Serialize;
use staffdir_core::rest::{EmptyBody, RestError};

/// Query parameters accepted by this API.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
#[serde(rename_all = "camelCase")]
pub(crate) struct EditQuery {
    /// Department to move the employee to.
    pub(crate) department_id: i64,

    /// New role of the employee.
    pub(crate) job_title: String,
}

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<EditQuery>, QueryRejection>,
    _: EmptyBody,
) -> Result<Json<Employee>, RestError> {
    let Path(id) = path?;
    let Query(query) = query?;

    let mut checker = ParamChecker::new("editEmployeeById");
    let id = checker.check("id", EmployeeId::new(id));
    let department_id = checker.check("departmentId", DepartmentId::new(query.department_id));
    let job_title = checker.check("jobTitle", JobTitle::new(query.job_title));
    let (Some(id), Some(department_id), Some(job_title)) = (id, department_id, job_title) else {
        return Err(checker.into_error());
    };

    let employee = driver.edit_employee(id, department_id, job_title).await?;
    Ok(Json(employee))
}
