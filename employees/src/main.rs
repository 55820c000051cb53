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

//! Entry point to the employee directory service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use staffdir_broker::{ActiveMqNotifier, ActiveMqOptions, LogNotifier, Notifier};
use staffdir_core::db::Db;
use staffdir_core::db::postgres::{PostgresDb, PostgresOptions};
use staffdir_core::env::get_optional_var;
use staffdir_employees::db::init_schema;
use staffdir_employees::serve;
use std::error::Error;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Port to listen on when `EMPLOYEES_PORT` is not set.
const DEFAULT_PORT: u16 = 3000;

/// Creates the notifier to announce changes with, based on the `BROKER_*` variables.
fn notifier_from_env() -> Result<Arc<dyn Notifier + Send + Sync>, String> {
    if get_optional_var::<String>("BROKER", "URL")?.is_none() {
        info!("BROKER_URL not set; notifications will only be logged");
        let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(LogNotifier::default());
        return Ok(notifier);
    }

    let opts = ActiveMqOptions::from_env("BROKER")?;
    let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(ActiveMqNotifier::new(opts)?);
    Ok(notifier)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let port = get_optional_var::<u16>("EMPLOYEES", "PORT")?.unwrap_or(DEFAULT_PORT);
    let addr = (Ipv4Addr::LOCALHOST, port);

    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    let db = Arc::new(PostgresDb::connect(db_opts));
    init_schema(&mut db.ex().await?).await?;
    info!("Database schema initialized");

    let notifier = notifier_from_env()?;

    serve(addr, db, notifier).await
}
