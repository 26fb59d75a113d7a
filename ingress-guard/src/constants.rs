// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// The only CloudTrail event name this crate acts on.
pub const AUTHORIZE_SECURITY_GROUP_INGRESS: &str = "AuthorizeSecurityGroupIngress";

/// Exact-match policy target. Equivalent spellings of the all-addresses
/// range do not count; the check is a string comparison on purpose.
pub const UNRESTRICTED_IPV4: &str = "0.0.0.0/0";

/// EC2's all-protocols sentinel. Revoke calls for this protocol must not
/// carry port fields.
pub const ALL_PROTOCOLS: &str = "-1";
