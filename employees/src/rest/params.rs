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

//! Validation of path and query parameters.

use staffdir_core::model::ModelResult;
use staffdir_core::rest::RestError;

/// Collects the violations of the parameters given to an operation so that they can all be
/// reported at once.
///
/// Every violation is prefixed by the name of the operation and the name of the parameter, as in
/// `getEmployeeById.id: must be greater than or equal to 1`.
pub(super) struct ParamChecker {
    /// Name of the operation whose parameters are being checked.
    operation: &'static str,

    /// Violations found so far.
    violations: Vec<String>,
}

impl ParamChecker {
    /// Starts checking the parameters of `operation`.
    pub(super) fn new(operation: &'static str) -> Self {
        Self { operation, violations: vec![] }
    }

    /// Records the outcome of parsing the `param` parameter, returning its value if valid.
    pub(super) fn check<T>(&mut self, param: &str, result: ModelResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.violations.push(format!("{}.{}: {}", self.operation, param, e));
                None
            }
        }
    }

    /// Converts the violations recorded so far into an error.
    pub(super) fn into_error(self) -> RestError {
        RestError::ConstraintViolation(self.violations)
    }
}
