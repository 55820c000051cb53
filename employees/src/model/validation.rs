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

//! Validation of the payload used to create employees.

use crate::model::{DepartmentId, JobTitle, NewEmployee};
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;

/// Message reported when the date of birth does not follow the `YYYY-MM-DD` format.
const INVALID_DATE_MESSAGE: &str = "Invalid date format";

/// Raw representation of an employee as received from a client.
///
/// All fields are optional so that missing values can be reported together with all other
/// problems in the request instead of failing deserialization on the first one.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EmployeeRequest {
    /// Identifier of the employee.  Ignored because identifiers are assigned by the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<i64>,

    /// Given name of the employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) first_name: Option<String>,

    /// Family name of the employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) last_name: Option<String>,

    /// Department the employee is assigned to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) department_id: Option<i64>,

    /// Role of the employee within the department.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) job_title: Option<String>,

    /// Gender of the employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) gender: Option<String>,

    /// Birth date of the employee in `YYYY-MM-DD` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) date_of_birth: Option<String>,
}

/// A single validation rule.
struct Rule {
    /// Predicate that returns true when the request satisfies the rule.
    check: fn(&EmployeeRequest) -> bool,

    /// Message to report when `check` fails.
    message: &'static str,
}

/// Returns true if `value` is present and not empty.
fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// Returns true if `value` is absent or has no whitespace characters.
fn has_no_whitespace(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| !s.chars().any(char::is_whitespace))
}

/// Returns true if `value` is absent or has between `min` and `max` characters, inclusive.
fn has_length(value: &Option<String>, min: usize, max: usize) -> bool {
    value.as_deref().is_none_or(|s| (min..=max).contains(&s.chars().count()))
}

/// Parses a `YYYY-MM-DD` calendar date.
fn parse_date(s: &str) -> Option<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]")).ok()
}

/// Returns the rules to apply to a creation request, in the order in which their violations are
/// reported.
fn rules() -> [Rule; 14] {
    [
        Rule {
            check: |r| is_filled(&r.first_name),
            message: "First name of birth must be not empty",
        },
        Rule {
            check: |r| has_no_whitespace(&r.first_name),
            message: "First name must have not whitespaces",
        },
        Rule {
            check: |r| has_length(&r.first_name, 3, 15),
            message: "First name must be between 3 and 15 characters",
        },
        Rule {
            check: |r| is_filled(&r.last_name),
            message: "Last name of birth must be not empty",
        },
        Rule {
            check: |r| has_no_whitespace(&r.last_name),
            message: "Last name must have not whitespaces",
        },
        Rule {
            check: |r| has_length(&r.last_name, 3, 15),
            message: "Last name must be between 3 and 15 characters",
        },
        Rule {
            check: |r| r.department_id.is_some(),
            message: "Department ID of birth must be not empty",
        },
        Rule {
            check: |r| r.department_id.is_none_or(|id| DepartmentId::new(id).is_ok()),
            message: "Department ID must between 1 and 2",
        },
        Rule {
            check: |r| is_filled(&r.job_title),
            message: "Job title of birth must be not empty",
        },
        Rule {
            check: |r| has_length(&r.job_title, 2, 25),
            message: "Job title must be between 2 and 25 characters",
        },
        Rule { check: |r| is_filled(&r.gender), message: "Gender of birth must be not empty" },
        Rule {
            check: |r| {
                r.gender
                    .as_deref()
                    .is_none_or(|g| matches!(g, "male" | "Male" | "female" | "Female"))
            },
            message: "Gender must be male or female",
        },
        Rule {
            check: |r| is_filled(&r.date_of_birth),
            message: "Date of birth must be not empty",
        },
        Rule {
            check: |r| {
                r.date_of_birth
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .is_none_or(|d| parse_date(d).is_some())
            },
            message: INVALID_DATE_MESSAGE,
        },
    ]
}

impl EmployeeRequest {
    /// Returns the messages of all the rules that this request violates.
    fn violations(&self) -> Vec<String> {
        rules()
            .iter()
            .filter(|rule| !(rule.check)(self))
            .map(|rule| rule.message.to_owned())
            .collect()
    }

    /// Validates the request and converts it into the details of a new employee.
    ///
    /// On failure, returns the messages of all violated rules.
    pub(crate) fn validate(self) -> Result<NewEmployee, Vec<String>> {
        let violations = self.violations();
        let (
            Some(first_name),
            Some(last_name),
            Some(department_id),
            Some(job_title),
            Some(gender),
            Some(date_of_birth),
        ) = (
            self.first_name,
            self.last_name,
            self.department_id,
            self.job_title,
            self.gender,
            self.date_of_birth,
        )
        else {
            return Err(violations);
        };
        if !violations.is_empty() {
            return Err(violations);
        }

        let department_id = DepartmentId::new(department_id).map_err(|e| vec![e.0])?;
        let job_title = JobTitle::new(job_title).map_err(|e| vec![e.0])?;
        let date_of_birth =
            parse_date(&date_of_birth).ok_or_else(|| vec![INVALID_DATE_MESSAGE.to_owned()])?;
        Ok(NewEmployee { first_name, last_name, department_id, job_title, gender, date_of_birth })
    }
}
