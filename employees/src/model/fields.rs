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

//! Newtypes for the employee fields that carry constraints beyond their primitive type.
//!
//! The error messages produced by the constructors are exposed to the user as-is, prefixed by the
//! name of the parameter that failed to validate.

use serde::{Deserialize, Serialize};
use staffdir_core::model::{ModelError, ModelResult};
use std::fmt;

/// Minimum length of a job title, in characters.
const MIN_JOB_TITLE_LENGTH: usize = 2;

/// Maximum length of a job title, in characters.
const MAX_JOB_TITLE_LENGTH: usize = 25;

/// Identifier of an employee as assigned by the database.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "i64", into = "i64")]
pub(crate) struct EmployeeId(i64);

impl EmployeeId {
    /// Creates a new identifier from an untrusted integer `id`.
    pub(crate) fn new(id: i64) -> ModelResult<Self> {
        if id < 1 {
            return Err(ModelError("must be greater than or equal to 1".to_owned()));
        }
        Ok(Self(id))
    }

    /// Returns the raw value of the identifier.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for EmployeeId {
    type Error = ModelError;

    fn try_from(id: i64) -> ModelResult<Self> {
        EmployeeId::new(id)
    }
}

impl From<EmployeeId> for i64 {
    fn from(id: EmployeeId) -> Self {
        id.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the department an employee belongs to.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "i64", into = "i16")]
pub(crate) struct DepartmentId(i16);

impl DepartmentId {
    /// Creates a new department identifier from an untrusted integer `id`.
    pub(crate) fn new(id: i64) -> ModelResult<Self> {
        match i16::try_from(id) {
            Ok(id @ 1..=2) => Ok(Self(id)),
            _ => Err(ModelError("must between 1 and 2".to_owned())),
        }
    }

    /// Returns the raw value of the identifier.
    pub(crate) fn as_i16(self) -> i16 {
        self.0
    }
}

impl TryFrom<i64> for DepartmentId {
    type Error = ModelError;

    fn try_from(id: i64) -> ModelResult<Self> {
        DepartmentId::new(id)
    }
}

impl From<DepartmentId> for i16 {
    fn from(id: DepartmentId) -> Self {
        id.0
    }
}

/// The job title of an employee.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct JobTitle(String);

impl JobTitle {
    /// Creates a new job title from an untrusted string `s`, making sure its length is valid.
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        let length = s.chars().count();
        if !(MIN_JOB_TITLE_LENGTH..=MAX_JOB_TITLE_LENGTH).contains(&length) {
            return Err(ModelError(format!(
                "must be between {} and {} characters",
                MIN_JOB_TITLE_LENGTH, MAX_JOB_TITLE_LENGTH
            )));
        }
        Ok(Self(s))
    }

    /// Returns a string view of the job title.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobTitle {
    type Error = ModelError;

    fn try_from(s: String) -> ModelResult<Self> {
        JobTitle::new(s)
    }
}

impl From<JobTitle> for String {
    fn from(title: JobTitle) -> Self {
        title.0
    }
}

#[cfg(test)]
impl From<&'static str> for JobTitle {
    /// Creates a new job title from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        JobTitle::new(s).expect("Hardcoded job titles must be valid")
    }
}
