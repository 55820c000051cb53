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

//! The `Employee` data type.

use crate::model::{DepartmentId, EmployeeId, JobTitle};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// An employee record as persisted in the database.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Employee {
    /// Identifier assigned by the database at creation time.
    id: EmployeeId,

    /// Given name of the employee.
    first_name: String,

    /// Family name of the employee.
    last_name: String,

    /// Department the employee is assigned to.
    department_id: DepartmentId,

    /// Role of the employee within the department.
    job_title: JobTitle,

    /// Gender of the employee.
    gender: String,

    /// Birth date of the employee.
    #[serde(with = "iso_date")]
    date_of_birth: Date,
}

impl Employee {
    /// Creates a new employee from its raw parts.
    pub(crate) fn new(id: EmployeeId, details: NewEmployee) -> Self {
        Self {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            department_id: details.department_id,
            job_title: details.job_title,
            gender: details.gender,
            date_of_birth: details.date_of_birth,
        }
    }

    /// Reassigns the employee to `department_id` with `job_title`, leaving all other details
    /// untouched.
    pub(crate) fn with_assignment(self, department_id: DepartmentId, job_title: JobTitle) -> Self {
        Self { department_id, job_title, ..self }
    }
}

/// The details of an employee that has not been stored yet and thus has no identifier.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NewEmployee {
    /// Given name of the employee.
    pub(crate) first_name: String,

    /// Family name of the employee.
    pub(crate) last_name: String,

    /// Department the employee is assigned to.
    pub(crate) department_id: DepartmentId,

    /// Role of the employee within the department.
    pub(crate) job_title: JobTitle,

    /// Gender of the employee.
    pub(crate) gender: String,

    /// Birth date of the employee.
    pub(crate) date_of_birth: Date,
}
