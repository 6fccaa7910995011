// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Entrypoint for the `dbseed` binary.

use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dbseed::config::Args;
use dbseed::postgres::PostgresConnector;
use dbseed::run::{Controller, RunReport};
use dbseed::{report, seed};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_filter))
        .with_target(false)
        .init();

    let endpoint = args.endpoint();
    info!("starting bootstrap run against {:?}", endpoint);

    let collection = seed::collection();
    let controller = Controller::new(
        PostgresConnector::new(endpoint),
        args.max_attempts,
        args.connect_retry_delay,
        collection.clone(),
        seed::seed_records(),
    );

    match controller.run().await {
        Ok(RunReport {
            inserted,
            load_error,
            read_error,
            rows,
        }) => {
            // The table goes to stdout; logging stays on its own channel.
            print!("{}", report::render(&collection, rows));
            if load_error.is_none() && read_error.is_none() {
                info!("run finished: {} new rows inserted", inserted);
            } else {
                for err in load_error.iter().chain(read_error.iter()) {
                    error!("{}", err);
                }
                error!("run failed");
                process::exit(1);
            }
        }
        Err(err) => {
            error!("{}", err);
            error!("run failed");
            process::exit(1);
        }
    }
}
