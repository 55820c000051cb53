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

//! Database abstraction to manipulate employee records.

use crate::model::{DepartmentId, Employee, EmployeeId, JobTitle, NewEmployee};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
#[cfg(feature = "postgres")]
use staffdir_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use staffdir_core::db::sqlite;
use staffdir_core::db::{DbError, DbResult, Executor};
use time::Date;

#[cfg(test)]
mod tests;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Builds an `Employee` from the raw values of a row.
fn build_employee(
    id: i64,
    first_name: String,
    last_name: String,
    department_id: i16,
    job_title: String,
    gender: String,
    date_of_birth: Date,
) -> DbResult<Employee> {
    let details = NewEmployee {
        first_name,
        last_name,
        department_id: DepartmentId::new(i64::from(department_id))?,
        job_title: JobTitle::new(job_title)?,
        gender,
        date_of_birth,
    };
    Ok(Employee::new(EmployeeId::new(id)?, details))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for Employee {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(postgres::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(postgres::map_sqlx_error)?;
        let department_id: i16 =
            row.try_get("department_id").map_err(postgres::map_sqlx_error)?;
        let job_title: String = row.try_get("job_title").map_err(postgres::map_sqlx_error)?;
        let gender: String = row.try_get("gender").map_err(postgres::map_sqlx_error)?;
        let date_of_birth: Date =
            row.try_get("date_of_birth").map_err(postgres::map_sqlx_error)?;

        build_employee(id, first_name, last_name, department_id, job_title, gender, date_of_birth)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for Employee {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let first_name: String = row.try_get("first_name").map_err(sqlite::map_sqlx_error)?;
        let last_name: String = row.try_get("last_name").map_err(sqlite::map_sqlx_error)?;
        let department_id: i16 = row.try_get("department_id").map_err(sqlite::map_sqlx_error)?;
        let job_title: String = row.try_get("job_title").map_err(sqlite::map_sqlx_error)?;
        let gender: String = row.try_get("gender").map_err(sqlite::map_sqlx_error)?;
        let date_of_birth: Date = row.try_get("date_of_birth").map_err(sqlite::map_sqlx_error)?;

        build_employee(id, first_name, last_name, department_id, job_title, gender, date_of_birth)
    }
}

/// Gets all employees in no particular order.
pub(crate) async fn get_employees(ex: &mut Executor) -> DbResult<Vec<Employee>> {
    let query_str = "SELECT * FROM employees";
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(Employee::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(Employee::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the employee with `id`, if it exists.
pub(crate) async fn find_employee(ex: &mut Executor, id: EmployeeId) -> DbResult<Option<Employee>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT * FROM employees WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.map(Employee::try_from).transpose()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM employees WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            row.map(Employee::try_from).transpose()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new employee with the given `details` and returns it with its assigned identifier.
pub(crate) async fn create_employee(ex: &mut Executor, details: NewEmployee) -> DbResult<Employee> {
    let id: i64 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                INSERT INTO employees
                    (first_name, last_name, department_id, job_title, gender, date_of_birth)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id";
            sqlx::query_scalar::<_, i64>(query_str)
                .bind(&details.first_name)
                .bind(&details.last_name)
                .bind(details.department_id.as_i16())
                .bind(details.job_title.as_str())
                .bind(&details.gender)
                .bind(details.date_of_birth)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO employees
                    (first_name, last_name, department_id, job_title, gender, date_of_birth)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING id";
            sqlx::query_scalar::<_, i64>(query_str)
                .bind(&details.first_name)
                .bind(&details.last_name)
                .bind(details.department_id.as_i16())
                .bind(details.job_title.as_str())
                .bind(&details.gender)
                .bind(details.date_of_birth)
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    Ok(Employee::new(EmployeeId::new(id)?, details))
}

/// Overwrites all the details of the existing `employee`, matching it by identifier.
pub(crate) async fn update_employee(ex: &mut Executor, employee: &Employee) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "
                UPDATE employees
                SET first_name = $1, last_name = $2, department_id = $3, job_title = $4,
                    gender = $5, date_of_birth = $6
                WHERE id = $7";
            let done = sqlx::query(query_str)
                .bind(employee.first_name())
                .bind(employee.last_name())
                .bind(employee.department_id().as_i16())
                .bind(employee.job_title().as_str())
                .bind(employee.gender())
                .bind(*employee.date_of_birth())
                .bind(employee.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE employees
                SET first_name = ?, last_name = ?, department_id = ?, job_title = ?,
                    gender = ?, date_of_birth = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(employee.first_name())
                .bind(employee.last_name())
                .bind(employee.department_id().as_i16())
                .bind(employee.job_title().as_str())
                .bind(employee.gender())
                .bind(*employee.date_of_birth())
                .bind(employee.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

/// Deletes the employee with `id`.
pub(crate) async fn delete_employee(ex: &mut Executor, id: EmployeeId) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let done = sqlx::query("DELETE FROM employees WHERE id = $1")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let done = sqlx::query("DELETE FROM employees WHERE id = ?")
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}
