//! Amazon SQS implementation of the queue client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::error::DisplayErrorContext;
use sluice_core::error::{Result, SluiceError};
use sluice_core::{
    ClientOptions, Message, QueueClient, ReceiveRequest, FETCH_LIMIT, MAX_WAIT_SECONDS,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Queue client backed by the AWS SDK
#[derive(Clone)]
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsQueue {
    /// Build a client from the default credential chain, applying `options`
    pub async fn connect(options: &ClientOptions) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &options.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "Loaded SQS client configuration");

        Self {
            client: aws_sdk_sqs::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl QueueClient for SqsQueue {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>> {
        let mut call = self
            .client
            .receive_message()
            .queue_url(&request.queue_url)
            .max_number_of_messages(request.max_messages.min(FETCH_LIMIT) as i32)
            .wait_time_seconds(request.wait_seconds.min(MAX_WAIT_SECONDS) as i32);

        if request.include_attributes {
            call = call.message_attribute_names("All");
        }

        let output = call
            .send()
            .await
            .map_err(|e| SluiceError::Queue(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(convert_message)
            .collect())
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| SluiceError::Queue(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

/// Convert an SDK message. Messages without an id or receipt handle cannot be
/// tracked or deleted and are skipped. Binary attributes are dropped.
fn convert_message(message: aws_sdk_sqs::types::Message) -> Option<Message> {
    let (Some(id), Some(receipt_handle)) = (message.message_id, message.receipt_handle) else {
        warn!("Skipping SQS message without id or receipt handle");
        return None;
    };

    let attributes: HashMap<String, String> = message
        .message_attributes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.string_value.map(|text| (name, text)))
        .collect();

    Some(Message {
        id,
        receipt_handle,
        body: message.body.unwrap_or_default(),
        attributes,
    })
}
