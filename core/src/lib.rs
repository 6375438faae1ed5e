/*!
# Sluice Core

Core library for Sluice, a bounded-concurrency message queue poller written in Rust.

This library provides the components needed to consume a queue safely:

- A poller running parallel worker loops under a global concurrency ceiling
- A task tracker that paces receive calls to the rate handlers complete
- An exponential backoff timer shared by every worker loop
- A queue client abstraction with an in-memory implementation
- Typed handler results and observer notifications
*/

pub mod backoff;
pub mod config;
pub mod error;
pub mod events;
pub mod handler;
pub mod message;
pub mod poller;
pub mod queue;
pub mod tracker;

pub use error::{Result, SluiceError};

pub use backoff::BackoffTimer;
pub use config::{ClientOptions, PollerConfig, MAX_CONCURRENCY};
pub use events::{ChannelObserver, NoopObserver, PollerEvent, PollerObserver};
pub use handler::MessageHandler;
/// Re-export core types for convenience
pub use message::{Disposition, Message};
pub use poller::Poller;
pub use queue::{InMemoryQueue, QueueClient, ReceiveRequest, FETCH_LIMIT, MAX_WAIT_SECONDS};
pub use tracker::TaskTracker;
