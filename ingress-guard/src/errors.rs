// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure in the pipeline is fatal to the current invocation.
/// Nothing here is retried or logged-and-skipped; the Lambda runtime owns
/// retry policy.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing incoming notification message {0}")]
    EnvelopeDecode(serde_json::Error),
    #[error("Error fetching archived log object {0}")]
    Fetch(String),
    #[error("Error decompressing archived log object {0}")]
    Decompress(#[from] std::io::Error),
    #[error("Error parsing decompressed trail log {0}")]
    TrailDecode(serde_json::Error),
    #[error("Incompatible requestParameters shape for event `{event_name}` {source}")]
    Extract {
        event_name: String,
        source: serde_json::Error,
    },
    #[error("RevokeSecurityGroupIngress call failed {0}")]
    Remediation(String),
}
