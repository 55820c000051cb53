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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::testutils::TestContext as DriverTestContext;
use crate::model::{Employee, EmployeeId, EmployeeRequest};
use crate::rest::app;
use axum::Router;
use staffdir_broker::testutils::RecorderNotifier;

/// Returns a creation request that passes all validation rules for an employee named
/// `first_name`.
pub(crate) fn employee_request(first_name: &str) -> EmployeeRequest {
    EmployeeRequest {
        id: None,
        first_name: Some(first_name.to_owned()),
        last_name: Some("Sergeev".to_owned()),
        department_id: Some(1),
        job_title: Some("QA".to_owned()),
        gender: Some("male".to_owned()),
        date_of_birth: Some("1989-08-07".to_owned()),
    }
}

/// State of a running test.
pub(crate) struct TestContext {
    /// Lower-level context that holds the database and the notifier.
    context: DriverTestContext,

    /// The app router under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app against an in-memory database and a recording notifier.
    pub(crate) async fn setup() -> Self {
        let context = DriverTestContext::setup().await;
        let app = app(context.driver());
        Self { context, app }
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Closes the backing database so that the app's requests fail in the store.
    pub(crate) async fn close_db(&self) {
        self.context.close_db().await;
    }

    /// Gets the notifier that records the app's announcements.
    pub(crate) fn notifier(&self) -> &RecorderNotifier {
        self.context.notifier()
    }

    /// Creates an employee by directly modifying the backing database.
    pub(crate) async fn create_employee(&self, first_name: &str) -> Employee {
        self.context.create_employee(first_name).await
    }

    /// Gets the employee with `id` by directly querying the backing database.
    pub(crate) async fn get_employee(&self, id: EmployeeId) -> Option<Employee> {
        db::find_employee(&mut self.context.ex().await, id).await.unwrap()
    }
}
