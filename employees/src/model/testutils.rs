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

//! Test utilities for the model.

use crate::model::{DepartmentId, JobTitle, NewEmployee};
use time::macros::date;

/// Creates the details of a valid employee whose only distinguishing field is `first_name`.
pub(crate) fn new_employee(first_name: &str) -> NewEmployee {
    NewEmployee {
        first_name: first_name.to_owned(),
        last_name: "Sergeev".to_owned(),
        department_id: DepartmentId::new(1).unwrap(),
        job_title: JobTitle::from("QA"),
        gender: "male".to_owned(),
        date_of_birth: date!(1989 - 08 - 07),
    }
}
