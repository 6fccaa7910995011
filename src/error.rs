// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Error taxonomy for a bootstrap run.
//!
//! Each pipeline stage surfaces its own failure kind; the run controller
//! decides which kinds are terminal and which are reported but survivable.

pub type Result<T, E = BootstrapError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The connection retry budget was used up without a successful session.
    ///
    /// Fatal. Nothing downstream has run, so no mutation has occurred.
    #[error("connection retry budget exhausted after {attempts} attempts: {last_cause:#}")]
    ConnectionExhausted {
        attempts: u64,
        last_cause: anyhow::Error,
    },

    /// Conditional schema creation failed.
    ///
    /// Fatal. "Already exists" is not an error here: the DDL is conditional
    /// by construction, so anything that does surface is a real problem
    /// (privileges, malformed spec).
    #[error("ensuring schema objects: {0:#}")]
    Schema(anyhow::Error),

    /// The bulk seed insert failed. Reported, but reporting still runs.
    #[error("loading seed records: {0:#}")]
    Load(anyhow::Error),

    /// The read-back failed. Reported; treated as an empty result for
    /// display purposes.
    #[error("reading back seed records: {0:#}")]
    Read(anyhow::Error),
}

impl BootstrapError {
    /// Whether this error aborts the run before the reporting stage.
    pub fn is_fatal(&self) -> bool {
        match self {
            BootstrapError::ConnectionExhausted { .. } | BootstrapError::Schema(_) => true,
            BootstrapError::Load(_) | BootstrapError::Read(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn fatality() {
        assert!(BootstrapError::ConnectionExhausted {
            attempts: 3,
            last_cause: anyhow!("boom"),
        }
        .is_fatal());
        assert!(BootstrapError::Schema(anyhow!("boom")).is_fatal());
        assert!(!BootstrapError::Load(anyhow!("boom")).is_fatal());
        assert!(!BootstrapError::Read(anyhow!("boom")).is_fatal());
    }

    #[test]
    fn display_includes_attempt_context() {
        let err = BootstrapError::ConnectionExhausted {
            attempts: 7,
            last_cause: anyhow!("connection refused"),
        };
        let msg = err.to_string();
        assert!(msg.contains("7 attempts"), "{}", msg);
        assert!(msg.contains("connection refused"), "{}", msg);
    }
}
