/*!
# Config Module

This module defines the poller configuration.

`PollerConfig` is immutable once handed to a poller. It deserializes with
serde defaults so it can be embedded in a layered settings file, and is
checked by `validate()` before a poller accepts it. `ClientOptions` are passed
through untouched to whichever queue client the binary builds.
*/

use crate::error::{Result, SluiceError};
use crate::queue::{FETCH_LIMIT, MAX_WAIT_SECONDS};
use serde::{Deserialize, Serialize};

/// Upper bound for `max_concurrency`
pub const MAX_CONCURRENCY: usize = 10_000;

fn default_max_concurrency() -> usize {
    10
}

fn default_wait_seconds() -> u64 {
    20
}

fn default_auto_delete() -> bool {
    true
}

/// Connection options for the queue service client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Region the queue lives in
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override, e.g. a local emulator
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Named credentials profile
    #[serde(default)]
    pub profile: Option<String>,
}

/// Configuration for a poller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Queue to consume from
    pub queue_url: String,

    /// Maximum number of messages processed at the same time
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// How long a receive call waits for a message before returning empty
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: u64,

    /// Whether message attributes are requested with every receive
    #[serde(default)]
    pub include_attributes: bool,

    /// Whether acknowledged messages are deleted
    #[serde(default = "default_auto_delete")]
    pub auto_delete: bool,

    /// Options passed through to the queue client
    #[serde(default)]
    pub client: ClientOptions,
}

impl PollerConfig {
    /// Create a configuration with defaults for `queue_url`
    pub fn new(queue_url: impl Into<String>) -> Self {
        Self {
            queue_url: queue_url.into(),
            max_concurrency: default_max_concurrency(),
            wait_seconds: default_wait_seconds(),
            include_attributes: false,
            auto_delete: default_auto_delete(),
            client: ClientOptions::default(),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_wait_seconds(mut self, wait_seconds: u64) -> Self {
        self.wait_seconds = wait_seconds;
        self
    }

    pub fn with_include_attributes(mut self, include_attributes: bool) -> Self {
        self.include_attributes = include_attributes;
        self
    }

    pub fn with_auto_delete(mut self, auto_delete: bool) -> Self {
        self.auto_delete = auto_delete;
        self
    }

    pub fn with_client(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }

    /// Number of worker loops needed to keep the pool busy: one per full batch
    pub fn worker_count(&self) -> usize {
        self.max_concurrency.div_ceil(FETCH_LIMIT)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.queue_url.trim().is_empty() {
            return Err(SluiceError::Config("queue_url must not be empty".into()));
        }

        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY {
            return Err(SluiceError::Config(format!(
                "max_concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                self.max_concurrency
            )));
        }

        if self.wait_seconds > MAX_WAIT_SECONDS {
            return Err(SluiceError::Config(format!(
                "wait_seconds must be at most {MAX_WAIT_SECONDS}, got {}",
                self.wait_seconds
            )));
        }

        Ok(())
    }
}
