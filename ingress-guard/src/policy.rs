// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::constants::{ALL_PROTOCOLS, UNRESTRICTED_IPV4};
use crate::trail::{CidrRange, IngressRuleChange};

impl CidrRange {
    /// Exact string comparison against `0.0.0.0/0`. Equivalent spellings
    /// (leading zeros, IPv6 `::/0`) do not match; this is a narrow policy,
    /// not CIDR arithmetic.
    pub fn is_unrestricted(&self) -> bool {
        self.cidr_ip == UNRESTRICTED_IPV4
    }
}

/// Everything needed to exactly reverse one authorized ingress rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RemediationRequest {
    pub group_id: String,
    pub cidr: String,
    pub protocol: String,
    pub from_port: i32,
    pub to_port: i32,
}

impl RemediationRequest {
    /// EC2 rejects revoke calls that pair port fields with the
    /// all-protocols sentinel, so those requests carry no ports.
    pub fn port_range(&self) -> Option<(i32, i32)> {
        if self.protocol == ALL_PROTOCOLS {
            None
        } else {
            Some((self.from_port, self.to_port))
        }
    }
}

/// One request per violating (permission, range) pair, walked in record
/// order. A permission with several unrestricted ranges yields several
/// requests; a range that is restricted yields none.
pub fn plan_remediation(change: &IngressRuleChange) -> Vec<RemediationRequest> {
    let mut requests = Vec::new();
    for permission in &change.ip_permissions.items {
        for range in &permission.ip_ranges.items {
            if range.is_unrestricted() {
                requests.push(RemediationRequest {
                    group_id: change.group_id.clone(),
                    cidr: range.cidr_ip.clone(),
                    protocol: permission.ip_protocol.clone(),
                    from_port: permission.from_port,
                    to_port: permission.to_port,
                });
            }
        }
    }
    requests
}
