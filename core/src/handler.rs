/*!
# Handler Module

This module defines the contract between the poller and user code.

A handler receives one message at a time and returns a `Disposition`:
`Acknowledge` lets the poller delete the message (when auto-delete is on),
`Retain` leaves it for redelivery. Returning an error has the same effect as
`Retain` and is reported to the poller's observer.

Any `Fn(Message) -> impl Future<Output = anyhow::Result<Disposition>>`
closure is a handler, so simple consumers need no extra type.
*/

use crate::message::{Disposition, Message};
use async_trait::async_trait;
use std::future::Future;

/// Processes messages received by the poller
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    /// Handle a single message
    async fn handle(&self, message: Message) -> anyhow::Result<Disposition>;
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Disposition>> + Send + 'static,
{
    async fn handle(&self, message: Message) -> anyhow::Result<Disposition> {
        (self)(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closures_are_handlers() {
        let handler = |message: Message| async move {
            if message.body.is_empty() {
                anyhow::bail!("empty body");
            }
            Ok(Disposition::from(message.body != "keep"))
        };

        let handler: &dyn MessageHandler = &handler;
        let ack = handler.handle(Message::new("1", "rh", "done")).await.unwrap();
        let keep = handler.handle(Message::new("2", "rh", "keep")).await.unwrap();

        assert_eq!(ack, Disposition::Acknowledge);
        assert_eq!(keep, Disposition::Retain);
        assert!(handler.handle(Message::new("3", "rh", "")).await.is_err());
    }
}
