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

//! Common utilities to interact with a PostgreSQL database.
//!
//! Connection failures are never retried: a request that cannot get hold of a connection within
//! the configured acquisition timeout fails with `DbError::Unavailable`.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use log::warn;
use sqlx::Transaction;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{
    PgConnectOptions, PgConnection, PgDatabaseError, PgPool, PgPoolOptions, Postgres,
};
use std::time::Duration;

/// Default value for the `acquire_timeout` configuration property.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Takes a raw SQLx error `e` and converts it to our generic error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::Database(e) => match e.downcast_ref::<PgDatabaseError>().code() {
            "23505" /* unique_violation */ => DbError::AlreadyExists,
            "53300" /* too_many_connections */ => DbError::Unavailable,
            code => DbError::BackendError(format!("pgsql error {}: {}", code, e)),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Same as `map_sqlx_error` but for failures to obtain a connection from the pool, which get
/// logged when they indicate an outage.
fn map_acquire_error(e: sqlx::Error) -> DbError {
    let e = map_sqlx_error(e);
    if e == DbError::Unavailable {
        warn!("Database is unavailable; failing the request");
    }
    e
}

/// Options to establish a connection to a PostgreSQL database.
#[derive(Derivative)]
#[derivative(Debug, Default)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct PostgresOptions {
    /// Host to connect to.
    pub host: String,

    /// Port to connect to (typically 5432).
    pub port: u16,

    /// Database name to connect to.
    pub database: String,

    /// Username to establish the connection with.
    pub username: String,

    /// Password to establish the connection with.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Minimum number of connections to keep open against the database.
    pub min_connections: Option<u32>,

    /// Maximum number of connections to allow against the database.
    pub max_connections: Option<u32>,

    /// Maximum time to wait for a connection before declaring the database unavailable.
    pub acquire_timeout: Duration,
}

impl PostgresOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME`, `<prefix>_PASSWORD`, `<prefix>_MIN_CONNECTIONS`,
    /// `<prefix>_MAX_CONNECTIONS` and `<prefix>_ACQUIRE_TIMEOUT` (in seconds).
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_required_var::<u16>(prefix, "PORT")?,
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
            acquire_timeout: get_optional_var::<Duration>(prefix, "ACQUIRE_TIMEOUT")?
                .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT),
        })
    }

    /// Builds the settings used to open every individual connection.
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
    }

    /// Builds the settings that govern the pool as a whole.
    fn pool_options(&self) -> PgPoolOptions {
        let mut pool_options = PgPoolOptions::new().acquire_timeout(self.acquire_timeout);
        if let Some(min_connections) = self.min_connections {
            pool_options = pool_options.min_connections(min_connections);
        }
        if let Some(max_connections) = self.max_connections {
            pool_options = pool_options.max_connections(max_connections);
        }
        pool_options
    }
}

/// A generic database executor implementation for PostgreSQL.
#[derive(Debug)]
pub enum PostgresExecutor {
    /// An executor backed by a connection.
    PoolExec(PoolConnection<Postgres>),

    /// An executor backed by a transaction.
    TxExec(Transaction<'static, Postgres>),
}

impl PostgresExecutor {
    /// Returns the raw connection to pass to `sqlx` operations.
    pub fn conn(&mut self) -> &mut PgConnection {
        match self {
            PostgresExecutor::PoolExec(conn) => &mut **conn,
            PostgresExecutor::TxExec(tx) => &mut **tx,
        }
    }

    /// Commits the transaction if this executor is backed by one.
    ///
    /// Calling this on a non-transaction-based executor results in a panic.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            PostgresExecutor::PoolExec(_) => unreachable!("Do not call commit on direct executors"),
            PostgresExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

/// A database instance backed by a PostgreSQL server.
pub struct PostgresDb {
    /// Shared PostgreSQL connection pool.
    pool: PgPool,
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("Dropping connection without having called close() first");
        }
    }
}

impl PostgresDb {
    /// Creates a new pool based on a set of options.
    ///
    /// Connections are established lazily, so this does not contact the server.
    pub fn connect(opts: PostgresOptions) -> Self {
        let pool = opts.pool_options().connect_lazy_with(opts.connect_options());
        Self { pool }
    }

    /// Returns an executor of the specific type used by this database.
    pub async fn typed_ex(&self) -> DbResult<PostgresExecutor> {
        let conn = self.pool.acquire().await.map_err(map_acquire_error)?;
        Ok(PostgresExecutor::PoolExec(conn))
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        let ex = self.typed_ex().await?;
        Ok(Executor::Postgres(ex))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = self.pool.begin().await.map_err(map_acquire_error)?;
        Ok(TxExecutor(Executor::Postgres(PostgresExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Helper function to initialize the database with a schema.
///
/// The `schema` may contain multiple statements separated by semicolons.
pub async fn run_schema(e: &mut PostgresExecutor, schema: &str) -> DbResult<()> {
    sqlx::raw_sql(schema).execute(e.conn()).await.map_err(map_sqlx_error)?;
    Ok(())
}

/// Test utilities for the PostgreSQL connection.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Creates a new connection to the test database configured via `PGSQL_TEST_*`.
    ///
    /// The pool holds a single connection whose `search_path` points at `pg_temp`, so any tables
    /// created during the test vanish at disconnection time.
    pub async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = PostgresOptions::from_env("PGSQL_TEST").unwrap();
        opts.min_connections = Some(1);
        opts.max_connections = Some(1);
        let db = PostgresDb::connect(opts);

        let mut ex = db.typed_ex().await.unwrap();
        sqlx::query("SET search_path TO pg_temp").execute(ex.conn()).await.unwrap();
        drop(ex);
        db
    }
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use crate::db::tests::{generate_db_ro_concurrent_tests, generate_db_rw_tests};
    use std::sync::Arc;
    use std::time::Instant;

    generate_db_ro_concurrent_tests!(
        {
            let _can_fail = env_logger::builder().is_test(true).try_init();

            // The concurrent tests need more than the single connection that setup() allows, so
            // they run without the pg_temp search path and must not write.
            Arc::new(PostgresDb::connect(PostgresOptions::from_env("PGSQL_TEST").unwrap()))
        },
        #[ignore = "Requires environment configuration and is expensive"]
    );

    generate_db_rw_tests!(
        Arc::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );

    /// Sets the required `PGSQL_*` variables, overridden or extended by `extra`, and runs `f`.
    fn with_required_vars<F: FnOnce()>(extra: &[(&'static str, Option<&'static str>)], f: F) {
        let mut vars = vec![
            ("PGSQL_HOST", Some("the-host")),
            ("PGSQL_PORT", Some("1234")),
            ("PGSQL_DATABASE", Some("the-database")),
            ("PGSQL_USERNAME", Some("the-username")),
            ("PGSQL_PASSWORD", Some("the-password")),
        ];
        vars.retain(|(name, _)| !extra.iter().any(|(other, _)| name == other));
        vars.extend_from_slice(extra);
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_postgres_options_from_env_defaults() {
        with_required_vars(&[], || {
            assert_eq!(
                PostgresOptions {
                    host: "the-host".to_owned(),
                    port: 1234,
                    database: "the-database".to_owned(),
                    username: "the-username".to_owned(),
                    password: "the-password".to_owned(),
                    min_connections: None,
                    max_connections: None,
                    acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
                },
                PostgresOptions::from_env("PGSQL").unwrap()
            );
        });
    }

    #[test]
    fn test_postgres_options_from_env_tuning() {
        let tuning = [
            ("PGSQL_MIN_CONNECTIONS", Some("10")),
            ("PGSQL_MAX_CONNECTIONS", Some("20")),
            ("PGSQL_ACQUIRE_TIMEOUT", Some("7")),
        ];
        with_required_vars(&tuning, || {
            let opts = PostgresOptions::from_env("PGSQL").unwrap();
            assert_eq!(Some(10), opts.min_connections);
            assert_eq!(Some(20), opts.max_connections);
            assert_eq!(Duration::from_secs(7), opts.acquire_timeout);
        });
    }

    #[test]
    fn test_postgres_options_from_env_missing() {
        for name in
            ["PGSQL_HOST", "PGSQL_PORT", "PGSQL_DATABASE", "PGSQL_USERNAME", "PGSQL_PASSWORD"]
        {
            with_required_vars(&[(name, None)], || {
                let err = PostgresOptions::from_env("PGSQL").unwrap_err();
                assert!(err.contains(&format!("{} not present", name)), "{}", err);
            });
        }
    }

    #[test]
    fn test_postgres_options_bad_port_type() {
        with_required_vars(&[("PGSQL_PORT", Some("not a number"))], || {
            let err = PostgresOptions::from_env("PGSQL").unwrap_err();
            assert!(err.contains("PGSQL_PORT"));
            assert!(err.contains("Invalid u16"));
        });
    }

    #[test]
    fn test_postgres_options_debug_hides_password() {
        let opts = PostgresOptions { password: "the-password".to_owned(), ..Default::default() };
        assert!(!format!("{:?}", opts).contains("the-password"));
    }

    #[test]
    fn test_map_sqlx_error_pool_timed_out() {
        assert_eq!(DbError::Unavailable, map_sqlx_error(sqlx::Error::PoolTimedOut));
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_without_retrying() {
        let db = PostgresDb::connect(PostgresOptions {
            host: "127.0.0.1".to_owned(),
            port: 1,
            database: "unused".to_owned(),
            username: "unused".to_owned(),
            password: "unused".to_owned(),
            acquire_timeout: Duration::from_millis(500),
            ..Default::default()
        });

        let start = Instant::now();
        let result = tokio::time::timeout(Duration::from_secs(10), db.ex())
            .await
            .expect("Acquiring a connection must give up after the acquire timeout");
        match result {
            Ok(_) => panic!("Connecting to a closed port must fail"),
            Err(DbError::Unavailable) | Err(DbError::BackendError(_)) => (),
            Err(e) => panic!("Unexpected error {:?}", e),
        }
        assert!(start.elapsed() < Duration::from_secs(5), "Took {:?}", start.elapsed());

        db.close().await;
    }
}
