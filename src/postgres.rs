// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! PostgreSQL-backed implementation of the store seam.

use anyhow::Context;
use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::types::ToSql;
use tokio_postgres::NoTls;
use tracing::{debug, warn};

use crate::config::EndpointDescriptor;
use crate::error::{BootstrapError, Result};
use crate::seed::{CollectionSpec, SeedRecord};
use crate::store::{SeedStore, StoreConnector};

/// Dials a PostgreSQL endpoint.
#[derive(Debug)]
pub struct PostgresConnector {
    endpoint: EndpointDescriptor,
}

impl PostgresConnector {
    pub fn new(endpoint: EndpointDescriptor) -> PostgresConnector {
        PostgresConnector { endpoint }
    }
}

#[async_trait]
impl StoreConnector for PostgresConnector {
    type Store = PostgresStore;

    async fn connect(&self) -> Result<PostgresStore, anyhow::Error> {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.endpoint.host)
            .port(self.endpoint.port)
            .user(&self.endpoint.user)
            .dbname(&self.endpoint.dbname);
        if let Some(password) = &self.endpoint.password {
            config.password(password);
        }
        let (client, connection) = config
            .connect(NoTls)
            .await
            .context("connecting to postgres")?;

        // The connection object performs the actual communication with the
        // database, so spawn it off to run on its own.
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!("postgres connection task errored: {}", e);
            }
        });

        Ok(PostgresStore {
            schema: self.endpoint.schema.clone(),
            client,
            connection,
        })
    }
}

/// A live session against a PostgreSQL server.
pub struct PostgresStore {
    schema: String,
    client: tokio_postgres::Client,
    connection: JoinHandle<()>,
}

#[async_trait]
impl SeedStore for PostgresStore {
    async fn ensure_schema(&self, collection: &CollectionSpec) -> Result<()> {
        let ddl = format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            postgres_protocol::escape::escape_identifier(&self.schema)
        );
        debug!("ddl-> {}", ddl);
        self.client
            .batch_execute(&ddl)
            .await
            .map_err(|e| BootstrapError::Schema(e.into()))?;

        let ddl = collection.create_table_sql(&self.schema);
        debug!("ddl-> {}", ddl);
        self.client
            .batch_execute(&ddl)
            .await
            .map_err(|e| BootstrapError::Schema(e.into()))?;
        Ok(())
    }

    async fn insert_seed(
        &self,
        collection: &CollectionSpec,
        records: &[SeedRecord],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }
        let sql = collection.insert_sql(&self.schema, records.len());
        debug!("dml-> {}", sql);
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(records.len() * 3);
        for record in records {
            params.push(&record.sku);
            params.push(&record.name);
            params.push(&record.price_cents);
        }
        // A single statement: the whole batch commits or none of it does,
        // and conflicting rows are skipped by the store itself.
        self.client
            .execute(&sql, &params)
            .await
            .map_err(|e| BootstrapError::Load(e.into()))
    }

    async fn fetch_all(&self, collection: &CollectionSpec) -> Result<Vec<SeedRecord>> {
        let sql = collection.select_all_sql(&self.schema);
        debug!("query-> {}", sql);
        let rows = self
            .client
            .query(&sql, &[])
            .await
            .map_err(|e| BootstrapError::Read(e.into()))?;
        Ok(rows
            .into_iter()
            .map(|row| SeedRecord {
                sku: row.get(0),
                name: row.get(1),
                price_cents: row.get(2),
            })
            .collect())
    }

    async fn close(self: Box<Self>) {
        let PostgresStore {
            client, connection, ..
        } = *self;
        // Dropping the client terminates the wire connection, which lets the
        // spawned connection task wind down.
        drop(client);
        if let Err(e) = connection.await {
            warn!("postgres connection task panicked: {}", e);
        }
    }
}
