// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The seam between the bootstrap pipeline and the target store.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{BootstrapError, Result};
use crate::seed::{CollectionSpec, SeedRecord};

/// A live session against the target store.
///
/// Sessions have single-owner discipline: `close` consumes the store, so a
/// session can only ever be released once, and the run controller guarantees
/// it is released on every exit path.
#[async_trait]
pub trait SeedStore: Send {
    /// Ensure the target namespace and collection exist.
    ///
    /// Must be implemented with the store's conditional-creation primitives;
    /// executing it any number of times has the same outcome.
    async fn ensure_schema(&self, collection: &CollectionSpec) -> Result<()>;

    /// Insert `records` as one duplicate-tolerant batch, returning the
    /// number of rows actually inserted. Records whose natural key already
    /// exists are left untouched.
    async fn insert_seed(
        &self,
        collection: &CollectionSpec,
        records: &[SeedRecord],
    ) -> Result<u64>;

    /// Read back all rows, in store-native order.
    async fn fetch_all(&self, collection: &CollectionSpec) -> Result<Vec<SeedRecord>>;

    /// Release the session.
    async fn close(self: Box<Self>);
}

/// Dials the endpoint. Each call is one independent connection attempt; a
/// failed attempt leaves nothing behind.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    type Store: SeedStore;

    async fn connect(&self) -> Result<Self::Store, anyhow::Error>;
}

/// Acquire a session with a bounded fixed-interval retry.
///
/// Performs at most `max_attempts` attempts with a constant `delay` between
/// them (and none after the last). The target's startup latency is roughly
/// constant, so a fixed interval is deliberate; do not swap in a backoff
/// policy, as tests rely on the exact attempt count and timing.
pub async fn acquire<C: StoreConnector>(
    connector: &C,
    max_attempts: u64,
    delay: Duration,
) -> Result<C::Store> {
    let mut last_cause = None;
    for attempt in 1..=max_attempts {
        match connector.connect().await {
            Ok(store) => {
                info!("connected on attempt {}/{}", attempt, max_attempts);
                return Ok(store);
            }
            Err(cause) => {
                warn!(
                    "connection attempt {}/{} failed: {:#}",
                    attempt, max_attempts, cause
                );
                last_cause = Some(cause);
                if attempt < max_attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
    Err(BootstrapError::ConnectionExhausted {
        attempts: max_attempts,
        last_cause: last_cause.unwrap_or_else(|| anyhow!("no connection attempts were made")),
    })
}
