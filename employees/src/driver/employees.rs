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

//! Operations on the collection of employees.

use crate::db;
use crate::driver::Driver;
use crate::model::{Employee, NewEmployee};
use staffdir_core::driver::DriverResult;

/// Sorts `employees` by ascending identifier.
fn sort_by_id(mut employees: Vec<Employee>) -> Vec<Employee> {
    employees.sort_by_key(|employee| *employee.id());
    employees
}

impl Driver {
    /// Stores a new employee with the given `details` and announces its creation.
    pub(crate) async fn add_employee(self, details: NewEmployee) -> DriverResult<Employee> {
        let mut tx = self.db.begin().await?;
        let employee = db::create_employee(tx.ex(), details).await?;
        tx.commit().await?;

        self.announce(format!(
            "Employee {} {} created!",
            employee.first_name(),
            employee.last_name()
        ))
        .await;

        Ok(employee)
    }

    /// Gets all employees sorted by their identifier.
    pub(crate) async fn list_employees(self) -> DriverResult<Vec<Employee>> {
        let mut ex = self.db.ex().await?;
        let employees = db::get_employees(&mut ex).await?;
        Ok(sort_by_id(employees))
    }
}
