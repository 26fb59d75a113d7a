// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde_derive::Deserialize;

use crate::errors::{Error, Result};

/// The SNS message body published on CloudTrail log delivery: the bucket
/// the log files landed in and their object keys. Both fields must be
/// present; nothing is defaulted. An empty key list is valid and means
/// there is nothing to do.
#[derive(Debug, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(rename = "s3Bucket")]
    pub s3_bucket: String,
    #[serde(rename = "s3ObjectKey")]
    pub s3_object_key: Vec<String>,
}

pub fn decode_envelope(body: &str) -> Result<NotificationEnvelope> {
    serde_json::from_str(body).map_err(Error::EnvelopeDecode)
}
