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

//! Test utilities for the business logic layer.

use crate::db;
use crate::driver::Driver;
use crate::model::Employee;
use crate::model::testutils::new_employee;
use staffdir_broker::testutils::RecorderNotifier;
use staffdir_core::db::{Db, Executor};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The notifier that captures the announcements of the driver.
    notifier: RecorderNotifier,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and a recording notifier.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(staffdir_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let notifier = RecorderNotifier::default();
        let driver = Driver::new(db.clone(), Arc::new(notifier.clone()));
        Self { db, notifier, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Closes the backing database so that any further access to it fails.
    pub(crate) async fn close_db(&self) {
        self.db.close().await;
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the notifier that records the driver's announcements.
    pub(crate) fn notifier(&self) -> &RecorderNotifier {
        &self.notifier
    }

    /// Creates an employee by directly modifying the backing database, bypassing the driver.
    pub(crate) async fn create_employee(&self, first_name: &str) -> Employee {
        db::create_employee(&mut self.ex().await, new_employee(first_name)).await.unwrap()
    }
}
