// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

use anyhow::{bail, Result};
use dnsupdater::updater::exchange::{DnsExchanger, Exchange};
use hickory_client::op::{Message, MessageType, OpCode, ResponseCode};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

/// A DNS server as seen by the updater: either down, or answering every
/// update with a fixed response code.
#[derive(Debug, Clone, Copy)]
pub enum ServerBehavior {
    Unreachable,
    Answer(ResponseCode),
}

/// Exchanger that answers on behalf of a set of scripted servers and keeps
/// every message it was asked to send.
#[derive(Default)]
pub struct FakeServers {
    behaviors: Vec<(String, ServerBehavior)>,
    refused_owners: HashSet<String>,
    sent: Mutex<Vec<(String, Message)>>,
}

impl FakeServers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server(mut self, name: &str, behavior: ServerBehavior) -> Self {
        self.behaviors.push((name.to_string(), behavior));
        self
    }

    /// Refuse any update whose first record is owned by `owner`.
    pub fn refuse_owner(mut self, owner: &str) -> Self {
        self.refused_owners.insert(owner.to_string());
        self
    }

    /// Servers contacted, in order.
    pub fn contacted(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(server, _)| server.clone())
            .collect()
    }

    /// Messages sent to `server`, in order.
    pub fn sent_to(&self, server: &str) -> Vec<Message> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == server)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl DnsExchanger for FakeServers {
    fn exchange(&self, message: &Message, server: &str) -> Result<Exchange> {
        self.sent
            .lock()
            .unwrap()
            .push((server.to_string(), message.clone()));

        let behavior = self
            .behaviors
            .iter()
            .find(|(name, _)| name == server)
            .map_or(ServerBehavior::Unreachable, |(_, b)| *b);

        let mut rcode = match behavior {
            ServerBehavior::Unreachable => bail!("connection refused by {server}"),
            ServerBehavior::Answer(rcode) => rcode,
        };

        let owner = message
            .name_servers()
            .first()
            .map(|r| r.name().to_string())
            .unwrap_or_default();
        if self.refused_owners.contains(&owner) {
            rcode = ResponseCode::Refused;
        }

        let mut response = Message::new();
        response
            .set_id(message.id())
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Update)
            .set_response_code(rcode);
        Ok(Exchange {
            response,
            rtt: Duration::from_millis(1),
        })
    }
}

/// Write `yaml` to a temporary record file.
pub fn record_file(yaml: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}
