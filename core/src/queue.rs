/*!
# Queue Module

This module defines the queue service abstraction for Sluice.

The poller only needs two operations from a queue service:
- Receiving a batch of at most ten messages, long-polling for a bounded time
- Deleting a message by receipt handle once it has been processed

The module includes:
- The `QueueClient` trait that every queue backend implements
- `ReceiveRequest`, the parameters of a single receive call
- An in-memory implementation (`InMemoryQueue`) with long polling, visibility
  timeouts and redelivery, used for tests and local runs

Network-backed clients live next to the binaries that configure them.
*/

use crate::error::{Result, SluiceError};
use crate::message::Message;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::{self, Instant};
use uuid::Uuid;

/// Maximum number of messages a single receive call may return
pub const FETCH_LIMIT: usize = 10;

/// Longest long-poll wait a single receive call may request, in seconds
pub const MAX_WAIT_SECONDS: u64 = 20;

/// Parameters of a single receive call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveRequest {
    /// Queue to receive from
    pub queue_url: String,

    /// Maximum number of messages to return, between 1 and `FETCH_LIMIT`
    pub max_messages: usize,

    /// How long to wait for at least one message before returning empty
    pub wait_seconds: u64,

    /// Whether message attributes should be returned
    pub include_attributes: bool,
}

/// Queue service operations used by the poller
#[async_trait]
pub trait QueueClient: Send + Sync + 'static {
    /// Receive up to `request.max_messages` messages
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>>;

    /// Delete a received message
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()>;
}

/// A message stored by the in-memory queue
#[derive(Debug, Clone)]
struct StoredMessage {
    id: String,
    body: String,
    attributes: HashMap<String, String>,
    receipt_handle: Option<String>,
    invisible_until: Option<Instant>,
    receive_count: u32,
}

impl StoredMessage {
    fn is_visible(&self, now: Instant) -> bool {
        match self.invisible_until {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }
}

/// In-memory queue service with SQS-like receive semantics
pub struct InMemoryQueue {
    url: String,
    visibility_timeout: Duration,
    messages: Arc<Mutex<VecDeque<StoredMessage>>>,
    notify: Arc<Notify>,
}

impl InMemoryQueue {
    /// Default time a received message stays hidden from other receivers
    pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new in-memory queue identified by `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_visibility_timeout(url, Self::DEFAULT_VISIBILITY_TIMEOUT)
    }

    /// Create a new in-memory queue with a custom visibility timeout
    pub fn with_visibility_timeout(url: impl Into<String>, visibility_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            visibility_timeout,
            messages: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a message, returning its id
    pub async fn send(&self, body: impl Into<String>) -> String {
        self.send_with_attributes(body, HashMap::new()).await
    }

    /// Send a message with attributes, returning its id
    pub async fn send_with_attributes(
        &self,
        body: impl Into<String>,
        attributes: HashMap<String, String>,
    ) -> String {
        let id = Uuid::new_v4().to_string();

        self.messages.lock().await.push_back(StoredMessage {
            id: id.clone(),
            body: body.into(),
            attributes,
            receipt_handle: None,
            invisible_until: None,
            receive_count: 0,
        });

        self.notify.notify_waiters();
        id
    }

    /// Number of messages in the queue, visible or not
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Check if the queue holds no messages at all
    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    /// How many times the message with `id` has been received
    pub async fn receive_count(&self, id: &str) -> Option<u32> {
        let messages = self.messages.lock().await;
        messages.iter().find(|m| m.id == id).map(|m| m.receive_count)
    }

    fn check_url(&self, queue_url: &str) -> Result<()> {
        if queue_url == self.url {
            Ok(())
        } else {
            Err(SluiceError::Queue(format!(
                "The specified queue does not exist: {}",
                queue_url
            )))
        }
    }

    /// Take up to `max` visible messages, hiding them for the visibility
    /// timeout. Also returns the earliest time a hidden message reappears.
    async fn take_visible(
        &self,
        max: usize,
        include_attributes: bool,
    ) -> (Vec<Message>, Option<Instant>) {
        let mut messages = self.messages.lock().await;
        let now = Instant::now();
        let mut batch = Vec::new();
        let mut next_visible = None;

        for stored in messages.iter_mut() {
            if !stored.is_visible(now) {
                next_visible = match (next_visible, stored.invisible_until) {
                    (Some(current), Some(deadline)) => Some(std::cmp::min(current, deadline)),
                    (None, deadline) => deadline,
                    (current, None) => current,
                };
                continue;
            }

            if batch.len() == max {
                continue;
            }

            let receipt_handle = Uuid::new_v4().to_string();
            stored.receipt_handle = Some(receipt_handle.clone());
            stored.invisible_until = Some(now + self.visibility_timeout);
            stored.receive_count += 1;

            batch.push(Message {
                id: stored.id.clone(),
                receipt_handle,
                body: stored.body.clone(),
                attributes: if include_attributes {
                    stored.attributes.clone()
                } else {
                    HashMap::new()
                },
            });
        }

        (batch, next_visible)
    }
}

#[async_trait]
impl QueueClient for InMemoryQueue {
    async fn receive(&self, request: ReceiveRequest) -> Result<Vec<Message>> {
        self.check_url(&request.queue_url)?;

        if request.max_messages == 0 || request.max_messages > FETCH_LIMIT {
            return Err(SluiceError::Queue(format!(
                "max_messages must be between 1 and {}, got {}",
                FETCH_LIMIT, request.max_messages
            )));
        }

        let deadline = Instant::now() + Duration::from_secs(request.wait_seconds);

        loop {
            // Registered before scanning so a send in between wakes us up
            let notified = self.notify.notified();

            let (batch, next_visible) = self
                .take_visible(request.max_messages, request.include_attributes)
                .await;

            if !batch.is_empty() || Instant::now() >= deadline {
                return Ok(batch);
            }

            let wake_at = match next_visible {
                Some(visible_at) => std::cmp::min(visible_at, deadline),
                None => deadline,
            };

            tokio::select! {
                _ = notified => {}
                _ = time::sleep_until(wake_at) => {}
            }
        }
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<()> {
        self.check_url(queue_url)?;

        let mut messages = self.messages.lock().await;
        let position = messages
            .iter()
            .position(|m| m.receipt_handle.as_deref() == Some(receipt_handle))
            .ok_or_else(|| {
                SluiceError::Queue(format!(
                    "The receipt handle is not valid: {}",
                    receipt_handle
                ))
            })?;

        messages.remove(position);
        Ok(())
    }
}
