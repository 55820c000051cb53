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

//! Operations on one employee.

use crate::db;
use crate::driver::{Driver, employee_not_found};
use crate::model::{DepartmentId, Employee, EmployeeId, JobTitle};
use staffdir_core::driver::DriverResult;

impl Driver {
    /// Deletes the employee with `id`.
    pub(crate) async fn delete_employee(self, id: EmployeeId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        if db::find_employee(tx.ex(), id).await?.is_none() {
            return Err(employee_not_found(id));
        }
        db::delete_employee(tx.ex(), id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Moves the employee with `id` to `department_id` with a new `job_title`.  All other details
    /// of the employee are preserved.
    pub(crate) async fn edit_employee(
        self,
        id: EmployeeId,
        department_id: DepartmentId,
        job_title: JobTitle,
    ) -> DriverResult<Employee> {
        let mut tx = self.db.begin().await?;
        let employee = match db::find_employee(tx.ex(), id).await? {
            Some(employee) => employee.with_assignment(department_id, job_title),
            None => return Err(employee_not_found(id)),
        };
        db::update_employee(tx.ex(), &employee).await?;
        tx.commit().await?;
        Ok(employee)
    }

    /// Gets the employee with `id`.
    pub(crate) async fn get_employee(self, id: EmployeeId) -> DriverResult<Employee> {
        let mut ex = self.db.ex().await?;
        db::find_employee(&mut ex, id).await?.ok_or_else(|| employee_not_found(id))
    }
}
