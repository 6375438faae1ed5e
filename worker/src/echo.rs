//! Handler echoing received messages to stdout.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use sluice_core::{Disposition, Message, MessageHandler};
use std::collections::HashMap;
use std::io::Write;

/// One line of handler output
#[derive(Serialize)]
struct EchoLine<'a> {
    received_at: String,
    id: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "no_attributes")]
    attributes: &'a HashMap<String, String>,
}

fn no_attributes(attributes: &&HashMap<String, String>) -> bool {
    attributes.is_empty()
}

/// Writes every received message to stdout as a JSON line and acknowledges it
pub struct EchoHandler;

fn render(message: &Message) -> anyhow::Result<String> {
    let line = EchoLine {
        received_at: Utc::now().to_rfc3339(),
        id: &message.id,
        body: &message.body,
        attributes: &message.attributes,
    };
    Ok(serde_json::to_string(&line)?)
}

#[async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(&self, message: Message) -> anyhow::Result<Disposition> {
        let line = render(&message)?;
        writeln!(std::io::stdout().lock(), "{line}")?;
        Ok(Disposition::Acknowledge)
    }
}
