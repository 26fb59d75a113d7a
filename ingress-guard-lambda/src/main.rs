// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{self, error, info, LevelFilter};
use serde_derive::{Deserialize, Serialize};
use simple_logger::SimpleLogger;

use ingress_guard::envelope::decode_envelope;
use ingress_guard::errors::Error as PipelineError;
use ingress_guard::policy::RemediationRequest;
use ingress_guard::{archive, scan_trail, trail};

/// The slice of the SNS trigger payload the handler reads. Defined here
/// rather than pulled from an events crate; the shape is stable.
#[derive(Debug, Deserialize)]
struct SnsEvent {
    #[serde(rename = "Records", default)]
    records: Vec<SnsEventRecord>,
}

#[derive(Debug, Deserialize)]
struct SnsEventRecord {
    #[serde(rename = "EventSource", default)]
    event_source: String,
    #[serde(rename = "Sns")]
    sns: SnsMessage,
}

#[derive(Debug, Deserialize)]
struct SnsMessage {
    #[serde(rename = "Timestamp", default)]
    timestamp: String,
    #[serde(rename = "Message")]
    message: String,
}

#[derive(Debug, Serialize)]
struct InvocationResponse {
    message: String,
}

/// Holds the client set for the life of the execution environment;
/// read-only after construction and reused across sequential invocations.
struct Handler {
    s3: aws_sdk_s3::Client,
    ec2: aws_sdk_ec2::Client,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;

    // No extra configuration is needed as long as the Lambda role carries
    // s3:GetObject on the trail bucket and ec2:RevokeSecurityGroupIngress.
    let config = aws_config::from_env().load().await;
    let handler = Handler {
        s3: aws_sdk_s3::Client::new(&config),
        ec2: aws_sdk_ec2::Client::new(&config),
    };
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<SnsEvent>| async move {
        handler.handle(event).await
    }))
    .await?;
    Ok(())
}

impl Handler {
    async fn handle(&self, event: LambdaEvent<SnsEvent>) -> Result<InvocationResponse, Error> {
        let (sns_event, _context) = event.into_parts();
        match self.process(&sns_event).await {
            Ok(()) => Ok(InvocationResponse {
                message: "Done".to_string(),
            }),
            Err(err) => {
                // first error aborts the whole batch; the runtime's retry
                // policy takes it from here
                error!("Invocation failed: {}", err);
                Err(err.into())
            }
        }
    }

    async fn process(&self, sns_event: &SnsEvent) -> Result<(), PipelineError> {
        for record in &sns_event.records {
            info!(
                "[{} {}] Message = {}",
                record.event_source, record.sns.timestamp, record.sns.message
            );
            let envelope = decode_envelope(&record.sns.message)?;
            for key in &envelope.s3_object_key {
                let contents = self.fetch_gzipped_object(&envelope.s3_bucket, key).await?;
                let trail = trail::decode_trail(&contents)?;
                for request in scan_trail(&trail)? {
                    self.revoke_security_group_ingress(&request).await?;
                }
            }
        }
        Ok(())
    }

    /// Fetches one delivered trail log from S3 and inflates it.
    async fn fetch_gzipped_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PipelineError> {
        let object = self
            .s3
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| PipelineError::Fetch(format!("s3://{}/{}: {}", bucket, key, err)))?;

        let compressed = object
            .body
            .collect()
            .await
            .map_err(|err| PipelineError::Fetch(format!("s3://{}/{}: {}", bucket, key, err)))?;

        archive::gunzip(&compressed.into_bytes())
    }

    /// One revoke call per planned request. Port fields are only set when
    /// the protocol is not the all-protocols sentinel; EC2 rejects the
    /// combination otherwise.
    async fn revoke_security_group_ingress(
        &self,
        request: &RemediationRequest,
    ) -> Result<(), PipelineError> {
        info!(
            "Revoking security group ingress with cidr {}, protocol {} ({})",
            request.cidr, request.protocol, request.group_id
        );

        let mut call = self
            .ec2
            .revoke_security_group_ingress()
            .group_id(request.group_id.as_str())
            .cidr_ip(request.cidr.as_str())
            .ip_protocol(request.protocol.as_str());
        if let Some((from_port, to_port)) = request.port_range() {
            call = call.from_port(from_port).to_port(to_port);
        }

        call.send().await.map_err(|err| {
            error!(
                "failed to revoke ingress rule {} on {}: {}",
                request.cidr, request.group_id, err
            );
            PipelineError::Remediation(err.to_string())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use pretty_assertions::assert_eq;

    // Construction never touches the network; the region is pinned so the
    // provider chain cannot wander off to IMDS.
    async fn offline_handler() -> Handler {
        let config = aws_config::from_env()
            .region(aws_sdk_s3::Region::new("eu-west-1"))
            .load()
            .await;
        Handler {
            s3: aws_sdk_s3::Client::new(&config),
            ec2: aws_sdk_ec2::Client::new(&config),
        }
    }

    #[tokio::test]
    async fn empty_key_list_is_done_with_zero_activity() {
        let handler = offline_handler().await;
        let event: SnsEvent = serde_json::from_str(
            r#"{
                "Records": [
                    {
                        "EventSource": "aws:sns",
                        "Sns": {
                            "Timestamp": "2021-01-01T12:01:00.000Z",
                            "Message": "{\"s3Bucket\":\"b\",\"s3ObjectKey\":[]}"
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        // no keys means neither client is ever exercised
        let response = handler
            .handle(LambdaEvent::new(event, Context::default()))
            .await
            .expect("empty key list must succeed");
        assert_eq!(response.message, "Done");
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"message":"Done"}"#
        );
    }

    #[tokio::test]
    async fn malformed_envelope_fails_before_any_fetch() {
        let handler = offline_handler().await;
        let event: SnsEvent = serde_json::from_str(
            r#"{
                "Records": [
                    {
                        "EventSource": "aws:sns",
                        "Sns": {
                            "Timestamp": "2021-01-01T12:01:00.000Z",
                            "Message": "Test notification"
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        let err = handler.process(&event).await.unwrap_err();
        assert!(matches!(err, PipelineError::EnvelopeDecode(_)));
    }

    #[test]
    fn decodes_sns_trigger_payload() {
        let event: SnsEvent = serde_json::from_str(
            r#"{
                "Records": [
                    {
                        "EventSource": "aws:sns",
                        "EventVersion": "1.0",
                        "Sns": {
                            "Type": "Notification",
                            "Timestamp": "2021-01-01T12:01:00.000Z",
                            "TopicArn": "arn:aws:sns:eu-west-1:123456789012:cloudtrail-delivery",
                            "Message": "{\"s3Bucket\":\"b\",\"s3ObjectKey\":[\"k\"]}"
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(event.records.len(), 1);
        let record = &event.records[0];
        assert_eq!(record.event_source, "aws:sns");

        let envelope = decode_envelope(&record.sns.message).unwrap();
        assert_eq!(envelope.s3_bucket, "b");
        assert_eq!(envelope.s3_object_key, vec!["k".to_string()]);
    }

    #[test]
    fn empty_batch_decodes() {
        let event: SnsEvent = serde_json::from_str(r#"{"Records": []}"#).unwrap();
        assert!(event.records.is_empty());
    }

    #[test]
    fn response_serializes_like_the_trigger_expects() {
        let body = serde_json::to_string(&InvocationResponse {
            message: "Done".to_string(),
        })
        .unwrap();
        assert_eq!(body, r#"{"message":"Done"}"#);
    }
}
