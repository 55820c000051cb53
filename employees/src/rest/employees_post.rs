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

//! API to create a new employee.

use crate::driver::Driver;
use crate::model::EmployeeRequest;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use staffdir_core::rest::RestError;

/// POST handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    request: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RestError> {
    let Json(request) = request?;
    let details = request.validate().map_err(RestError::ConstraintViolation)?;

    let employee = driver.add_employee(details).await?;

    let location = format!("/employees/{}", employee.id());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}
