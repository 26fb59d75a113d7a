// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io::Read;

use flate2::read::GzDecoder;

use crate::errors::Result;

/// Inflates one gzip-compressed trail log fetched from S3. The decoder is
/// dropped on every path, error paths included.
pub fn gunzip(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut contents = Vec::new();
    decoder.read_to_end(&mut contents)?;
    Ok(contents)
}
