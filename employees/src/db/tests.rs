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

//! Common tests for any database implementation.

use crate::db::*;
use crate::model::testutils::new_employee;
use crate::model::{DepartmentId, EmployeeId, JobTitle};
use staffdir_core::db::Db;
use std::sync::Arc;

async fn test_create_and_find(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let first = create_employee(&mut ex, new_employee("First")).await.unwrap();
    let second = create_employee(&mut ex, new_employee("Second")).await.unwrap();
    assert_ne!(first.id(), second.id());
    assert_eq!("First", first.first_name());
    assert_eq!("Second", second.first_name());

    assert_eq!(Some(first.clone()), find_employee(&mut ex, *first.id()).await.unwrap());
    assert_eq!(Some(second.clone()), find_employee(&mut ex, *second.id()).await.unwrap());
}

async fn test_find_missing(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    create_employee(&mut ex, new_employee("First")).await.unwrap();
    assert_eq!(None, find_employee(&mut ex, EmployeeId::new(1000).unwrap()).await.unwrap());
}

async fn test_get_employees(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert!(get_employees(&mut ex).await.unwrap().is_empty());

    let mut exp_employees = vec![];
    for name in ["Alice", "Bob", "Charlie"] {
        exp_employees.push(create_employee(&mut ex, new_employee(name)).await.unwrap());
    }

    let mut employees = get_employees(&mut ex).await.unwrap();
    employees.sort_by_key(|e| *e.id());
    assert_eq!(exp_employees, employees);
}

async fn test_create_rolled_back(db: Arc<dyn Db + Send + Sync>) {
    let id = {
        let mut tx = db.begin().await.unwrap();
        let employee = create_employee(tx.ex(), new_employee("Ghost")).await.unwrap();
        *employee.id()
    };

    assert_eq!(None, find_employee(&mut db.ex().await.unwrap(), id).await.unwrap());
}

async fn test_update_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let employee = create_employee(&mut ex, new_employee("First")).await.unwrap();
    let other = create_employee(&mut ex, new_employee("Other")).await.unwrap();

    let edited = employee
        .clone()
        .with_assignment(DepartmentId::new(2).unwrap(), JobTitle::from("Java Developer"));
    update_employee(&mut ex, &edited).await.unwrap();

    assert_eq!(Some(edited), find_employee(&mut ex, *employee.id()).await.unwrap());
    assert_eq!(Some(other.clone()), find_employee(&mut ex, *other.id()).await.unwrap());
}

async fn test_update_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let employee = create_employee(&mut ex, new_employee("First")).await.unwrap();
    delete_employee(&mut ex, *employee.id()).await.unwrap();

    assert_eq!(DbError::NotFound, update_employee(&mut ex, &employee).await.unwrap_err());
}

async fn test_delete_ok(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let employee = create_employee(&mut ex, new_employee("First")).await.unwrap();
    let other = create_employee(&mut ex, new_employee("Other")).await.unwrap();

    delete_employee(&mut ex, *employee.id()).await.unwrap();

    assert_eq!(None, find_employee(&mut ex, *employee.id()).await.unwrap());
    assert_eq!(vec![other], get_employees(&mut ex).await.unwrap());
}

async fn test_delete_not_found(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert_eq!(
        DbError::NotFound,
        delete_employee(&mut ex, EmployeeId::new(5).unwrap()).await.unwrap_err()
    );
}

async fn test_ids_not_reused(db: Arc<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let first = create_employee(&mut ex, new_employee("First")).await.unwrap();
    delete_employee(&mut ex, *first.id()).await.unwrap();
    let second = create_employee(&mut ex, new_employee("Second")).await.unwrap();

    assert!(second.id() > first.id());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        staffdir_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_create_and_find,
            test_find_missing,
            test_get_employees,
            test_create_rolled_back,
            test_update_ok,
            test_update_not_found,
            test_delete_ok,
            test_delete_not_found,
            test_ids_not_reused
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use staffdir_core::db::postgres::PostgresDb;

    async fn setup() -> PostgresDb {
        let db = staffdir_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        Arc::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use staffdir_core::db::sqlite::SqliteDb;

    async fn setup() -> SqliteDb {
        let db = staffdir_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(Arc::new(setup().await));
}
