// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Command-line arguments and the endpoint descriptor.

use std::fmt;
use std::time::Duration;

use clap::Parser;

/// Idempotently bootstrap a PostgreSQL instance with a schema and seed data.
#[derive(Parser, Debug)]
#[clap(name = "dbseed")]
pub struct Args {
    /// Address of the target PostgreSQL server.
    #[clap(long, default_value = "localhost")]
    pub host: String,
    /// Port the target PostgreSQL server listens on.
    #[clap(long, default_value = "5432")]
    pub port: u16,
    /// User to connect as.
    #[clap(long, default_value = "postgres")]
    pub user: String,
    /// Password to authenticate with, if the server requires one.
    #[clap(long, env = "DBSEED_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Database to connect to.
    #[clap(long, default_value = "postgres")]
    pub dbname: String,
    /// Schema in which the seed collection lives.
    #[clap(long, default_value = "bootstrap")]
    pub schema: String,
    /// Maximum number of connection attempts before giving up.
    #[clap(long, default_value = "10")]
    pub max_attempts: u64,
    /// Fixed delay between connection attempts.
    #[clap(long, value_parser = humantime::parse_duration, default_value = "5s")]
    pub connect_retry_delay: Duration,
    /// Which log messages to emit, as a `tracing_subscriber` filter directive.
    #[clap(long, env = "DBSEED_LOG_FILTER", default_value = "info")]
    pub log_filter: String,
}

impl Args {
    pub fn endpoint(&self) -> EndpointDescriptor {
        EndpointDescriptor {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            dbname: self.dbname.clone(),
            schema: self.schema.clone(),
        }
    }
}

/// Everything needed to reach the target store.
///
/// Immutable for the lifetime of one bootstrap run; constructed once from
/// [`Args`] and only ever passed by reference afterwards.
#[derive(Clone)]
pub struct EndpointDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
    /// Target namespace for the seed collection.
    pub schema: String,
}

impl fmt::Debug for EndpointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The password must never appear in logs.
        f.debug_struct("EndpointDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("dbname", &self.dbname)
            .field("schema", &self.schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> EndpointDescriptor {
        EndpointDescriptor {
            host: "10.0.0.7".into(),
            port: 5432,
            user: "seeder".into(),
            password: Some("hunter2".into()),
            dbname: "postgres".into(),
            schema: "bootstrap".into(),
        }
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", descriptor());
        assert!(!rendered.contains("hunter2"), "{}", rendered);
        assert!(rendered.contains("<redacted>"), "{}", rendered);
    }

    #[test]
    fn args_defaults() {
        let args = Args::parse_from(["dbseed"]);
        assert_eq!(args.port, 5432);
        assert_eq!(args.max_attempts, 10);
        assert_eq!(args.connect_retry_delay, Duration::from_secs(5));
        assert_eq!(args.schema, "bootstrap");
    }

    #[test]
    fn args_parse_retry_delay() {
        let args = Args::parse_from(["dbseed", "--connect-retry-delay", "250ms"]);
        assert_eq!(args.connect_retry_delay, Duration::from_millis(250));
    }
}
