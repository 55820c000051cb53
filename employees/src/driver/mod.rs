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

//! Business logic for the service.

use crate::model::EmployeeId;
use log::{info, warn};
use staffdir_broker::Notifier;
use staffdir_core::db::Db;
use staffdir_core::driver::DriverError;
use std::sync::Arc;

mod employee;
mod employees;
#[cfg(test)]
pub(crate) mod testutils;

/// Topic to which employee lifecycle announcements are published.
pub(crate) const EMPLOYEE_TOPIC: &str = "employee.topic";

/// Business logic.
///
/// The public operations exposed by the driver are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the driver in an attempt to minimize the possibility of executing
/// two operations.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The database that the driver uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// The broker to announce changes to.
    notifier: Arc<dyn Notifier + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        db: Arc<dyn Db + Send + Sync>,
        notifier: Arc<dyn Notifier + Send + Sync>,
    ) -> Self {
        Self { db, notifier }
    }

    /// Publishes `message` to the employee topic.
    ///
    /// Failures are logged and otherwise ignored: the change that triggered the announcement has
    /// already been committed.
    async fn announce(&self, message: String) {
        info!("Publishing to {}: {}", EMPLOYEE_TOPIC, message);
        if let Err(e) = self.notifier.publish(EMPLOYEE_TOPIC, &message).await {
            warn!("Failed to publish to {}: {}", EMPLOYEE_TOPIC, e);
        }
    }
}

/// Builds the error returned when the employee `id` does not exist.
fn employee_not_found(id: EmployeeId) -> DriverError {
    DriverError::NotFound(format!("Employee with ID: {} Not Found!", id))
}
