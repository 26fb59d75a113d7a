// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod archive;
pub mod constants;
pub mod envelope;
pub mod errors;
pub mod policy;
pub mod trail;

use log::info;

use crate::errors::Result;
use crate::policy::{plan_remediation, RemediationRequest};
use crate::trail::{ApiCall, AuditLog};

/// Walks every record of one delivered trail log and collects the
/// revocations needed to undo unrestricted ingress authorizations.
/// Unrecognized event names contribute nothing; a recognized record
/// with an incompatible shape fails the whole scan.
pub fn scan_trail(trail: &AuditLog) -> Result<Vec<RemediationRequest>> {
    let mut requests = Vec::new();
    for record in &trail.records {
        match record.classify()? {
            ApiCall::AuthorizeSecurityGroupIngress(change) => {
                info!(
                    "Found AuthorizeSecurityGroupIngress event {}",
                    record.origin()
                );
                info!("RequestParameters: {:?}", change);
                requests.extend(plan_remediation(&change));
            }
            ApiCall::Unrecognized => {}
        }
    }
    Ok(requests)
}
