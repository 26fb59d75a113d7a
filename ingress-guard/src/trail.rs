// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde_derive::Deserialize;
use serde_json::Value;

use crate::constants::AUTHORIZE_SECURITY_GROUP_INGRESS;
use crate::errors::{Error, Result};

/// One delivered CloudTrail log file. A file without a `records` key
/// decodes to an empty log, matching the service's delivery format.
#[derive(Debug, Deserialize)]
pub struct AuditLog {
    #[serde(rename = "records", default)]
    pub records: Vec<AuditRecord>,
}

/// A single trail record. `request_parameters` stays untyped here; its
/// shape depends on `event_name` and is only given a schema once the
/// record is classified. The metadata fields are carried for log lines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_source: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub aws_region: Option<String>,
    #[serde(rename = "sourceIPAddress", default)]
    pub source_ip_address: Option<String>,
    #[serde(default)]
    pub request_parameters: Value,
}

/// The set of API calls the classifier recognizes. Supporting another
/// event name means a new variant here and a new arm in
/// [`AuditRecord::classify`]; existing arms are untouched.
#[derive(Debug)]
pub enum ApiCall {
    AuthorizeSecurityGroupIngress(IngressRuleChange),
    Unrecognized,
}

impl AuditRecord {
    /// Total over every `event_name`: anything not recognized maps to
    /// `Unrecognized`, which is filtering rather than failure. Extraction
    /// errors for recognized names are fatal.
    pub fn classify(&self) -> Result<ApiCall> {
        match self.event_name.as_str() {
            AUTHORIZE_SECURITY_GROUP_INGRESS => Ok(ApiCall::AuthorizeSecurityGroupIngress(
                self.extract::<IngressRuleChange>()?,
            )),
            _ => Ok(ApiCall::Unrecognized),
        }
    }

    /// Provenance summary for log lines; absent metadata reads as `unknown`
    /// rather than failing, since only `event_name` is guaranteed.
    pub fn origin(&self) -> String {
        format!(
            "[{} {} {}] from {}",
            self.event_source.as_deref().unwrap_or("unknown"),
            self.event_time.as_deref().unwrap_or("unknown"),
            self.aws_region.as_deref().unwrap_or("unknown"),
            self.source_ip_address.as_deref().unwrap_or("unknown"),
        )
    }

    fn extract<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.request_parameters.clone()).map_err(|err| Error::Extract {
            event_name: self.event_name.clone(),
            source: err,
        })
    }
}

/// `requestParameters` of an AuthorizeSecurityGroupIngress call, reshaped
/// into a fixed schema. Unknown fields are ignored; list nesting and order
/// are preserved exactly as they appear in the record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRuleChange {
    pub group_id: String,
    #[serde(default)]
    pub ip_permissions: Items<IngressPermission>,
}

/// CloudTrail wraps every list in an object with an `items` key.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct Items<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> Default for Items<T> {
    fn default() -> Self {
        Items { items: Vec::new() }
    }
}

/// Ports default to 0 when the record omits them; they only mean anything
/// when `ip_protocol` is not the all-protocols sentinel.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressPermission {
    pub ip_protocol: String,
    #[serde(default)]
    pub from_port: i32,
    #[serde(default)]
    pub to_port: i32,
    #[serde(default)]
    pub ip_ranges: Items<CidrRange>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrRange {
    pub cidr_ip: String,
}

pub fn decode_trail(contents: &[u8]) -> Result<AuditLog> {
    serde_json::from_slice(contents).map_err(Error::TrailDecode)
}
