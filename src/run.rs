// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The run controller: a linear state machine over one bootstrap session.
//!
//! States run `Idle → Connecting → Initializing → Loading → Reporting →
//! Closed`, with fatal failures short-circuiting to `Closed`. Whatever path
//! a run takes, an acquired session is released exactly once: `close`
//! consumes the store, and every branch below the acquisition point funnels
//! through the same release.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::{BootstrapError, Result};
use crate::seed::{CollectionSpec, SeedRecord};
use crate::store::{self, SeedStore, StoreConnector};

/// Phases of one bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Connecting,
    Initializing,
    Loading,
    Reporting,
    Closed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Idle => "idle",
            State::Connecting => "connecting",
            State::Initializing => "initializing",
            State::Loading => "loading",
            State::Reporting => "reporting",
            State::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// What one run did. Load and read failures are carried here rather than
/// aborting the run: showing the store's current state wins over fail-fast.
#[derive(Debug)]
pub struct RunReport {
    /// Rows actually inserted; 0 on a fully idempotent repeat run or when
    /// the load failed.
    pub inserted: u64,
    pub load_error: Option<BootstrapError>,
    pub read_error: Option<BootstrapError>,
    /// The read-back rows, in store-native order; empty if the read failed.
    pub rows: Vec<SeedRecord>,
}

impl RunReport {
    /// Whether every stage of the run succeeded.
    pub fn is_clean(&self) -> bool {
        self.load_error.is_none() && self.read_error.is_none()
    }
}

/// Drives one bootstrap run end to end.
pub struct Controller<C> {
    connector: C,
    max_attempts: u64,
    connect_retry_delay: Duration,
    collection: CollectionSpec,
    records: Vec<SeedRecord>,
}

impl<C: StoreConnector> Controller<C> {
    pub fn new(
        connector: C,
        max_attempts: u64,
        connect_retry_delay: Duration,
        collection: CollectionSpec,
        records: Vec<SeedRecord>,
    ) -> Controller<C> {
        Controller {
            connector,
            max_attempts,
            connect_retry_delay,
            collection,
            records,
        }
    }

    /// Run the pipeline. `Err` means a fatal failure (connection exhaustion
    /// or a schema failure); load and read failures surface in the report.
    pub async fn run(&self) -> Result<RunReport> {
        self.transition(State::Idle, State::Connecting);
        let store =
            match store::acquire(&self.connector, self.max_attempts, self.connect_retry_delay)
                .await
            {
                Ok(store) => store,
                Err(err) => {
                    // Nothing was touched and no session exists to release.
                    self.transition(State::Connecting, State::Closed);
                    return Err(err);
                }
            };

        self.transition(State::Connecting, State::Initializing);
        let outcome = self.drive(&store).await;
        Box::new(store).close().await;
        self.transition(
            match &outcome {
                Ok(_) => State::Reporting,
                Err(_) => State::Initializing,
            },
            State::Closed,
        );
        outcome
    }

    /// Everything between session acquisition and release. Must not consume
    /// the store; the caller owns the single release.
    async fn drive(&self, store: &C::Store) -> Result<RunReport> {
        store.ensure_schema(&self.collection).await?;
        self.transition(State::Initializing, State::Loading);

        let (inserted, load_error) = match store.insert_seed(&self.collection, &self.records).await
        {
            Ok(inserted) => {
                info!("loaded seed data: {} new rows", inserted);
                (inserted, None)
            }
            Err(err) => {
                warn!("{}", err);
                (0, Some(err))
            }
        };
        // Continue to reporting even after a load failure so the operator
        // can see what the store currently holds.
        self.transition(State::Loading, State::Reporting);

        let (rows, read_error) = match store.fetch_all(&self.collection).await {
            Ok(rows) => (rows, None),
            Err(err) => {
                warn!("{}", err);
                (Vec::new(), Some(err))
            }
        };

        Ok(RunReport {
            inserted,
            load_error,
            read_error,
            rows,
        })
    }

    fn transition(&self, from: State, to: State) {
        info!("{} -> {}", from, to);
    }
}
