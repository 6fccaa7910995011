// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Idempotent first-boot seeding for a freshly provisioned PostgreSQL
//! instance.
//!
//! The provisioning layer hands us an endpoint that may not be up yet: the
//! compute node exists, but the containerized database behind it starts
//! asynchronously. `dbseed` dials that endpoint with a bounded fixed-interval
//! retry, conditionally creates the target schema objects, bulk-inserts a
//! fixed seed dataset with duplicate-tolerant semantics, and renders the
//! result for human confirmation. Running it any number of times, including
//! over the debris of a partially successful earlier attempt, leaves the
//! store in the same state as running it once.

pub mod config;
pub mod error;
pub mod postgres;
pub mod report;
pub mod run;
pub mod seed;
pub mod store;
