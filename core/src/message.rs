/*!
# Message Module

This module defines the message abstraction handed to user handlers.

Each message received from the queue service carries:
- An identifier, used as the dedup key while the message is in flight
- A receipt handle, required to delete the message once it is processed
- The raw body, left unparsed
- Optional string attributes, present only when attributes were requested

The module also defines `Disposition`, the explicit outcome a handler returns
to decide whether a message is deleted or left for redelivery.
*/

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A message received from the queue service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier assigned by the queue service
    pub id: String,

    /// Handle for this particular receipt of the message
    pub receipt_handle: String,

    /// Raw message body
    pub body: String,

    /// Message attributes, keyed by attribute name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl Message {
    /// Create a new message without attributes
    pub fn new(
        id: impl Into<String>,
        receipt_handle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            receipt_handle: receipt_handle.into(),
            body: body.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute to the message
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// What the poller should do with a message once its handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Disposition {
    /// Processing succeeded; delete the message when auto-delete is enabled
    Acknowledge,
    /// Leave the message in the queue for redelivery after its visibility timeout
    Retain,
}

impl Disposition {
    pub fn is_acknowledge(self) -> bool {
        matches!(self, Self::Acknowledge)
    }
}

impl From<bool> for Disposition {
    fn from(acknowledge: bool) -> Self {
        if acknowledge {
            Self::Acknowledge
        } else {
            Self::Retain
        }
    }
}
