// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Request/response transport for update messages.

use anyhow::{anyhow, Context, Result};
use hickory_client::client::{Client, SyncClient};
use hickory_client::op::Message;
use hickory_client::tcp::TcpClientConnection;
use hickory_proto::rr::dnssec::tsig::TSigner;
use hickory_proto::xfer::{DnsRequest, DnsRequestOptions};
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::{Duration, Instant};

use super::tsig::create_tsig_signer;
use crate::config::TsigKeyConfig;
use crate::constants::{DEFAULT_EXCHANGE_TIMEOUT_SECS, DNS_PORT};

/// The answer to one exchanged message.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub response: Message,
    pub rtt: Duration,
}

/// Sends one message to one server and waits for the answer.
pub trait DnsExchanger: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the exchange does not complete.
    fn exchange(&self, message: &Message, server: &str) -> Result<Exchange>;
}

/// Blocking exchanger over TCP, optionally signing with a static TSIG key.
#[derive(Clone)]
pub struct HickoryExchanger {
    timeout: Duration,
    signer: Option<(String, TSigner)>,
}

impl std::fmt::Debug for HickoryExchanger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryExchanger")
            .field("timeout", &self.timeout)
            .field("tsig_key", &self.signer.as_ref().map(|(name, _)| name))
            .finish()
    }
}

impl Default for HickoryExchanger {
    fn default() -> Self {
        Self::new()
    }
}

impl HickoryExchanger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_EXCHANGE_TIMEOUT_SECS),
            signer: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sign every message with `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if a signer cannot be built from the key.
    pub fn with_tsig_key(mut self, key: &TsigKeyConfig) -> Result<Self> {
        self.signer = Some((key.name.clone(), create_tsig_signer(key)?));
        Ok(self)
    }
}

impl DnsExchanger for HickoryExchanger {
    fn exchange(&self, message: &Message, server: &str) -> Result<Exchange> {
        let server_addr = resolve_server(server)?;
        let conn = TcpClientConnection::with_timeout(server_addr, self.timeout)
            .with_context(|| format!("Failed to create TCP connection to {server_addr}"))?;

        let client = match &self.signer {
            Some((_, signer)) => SyncClient::with_tsigner(conn, signer.clone()),
            None => SyncClient::new(conn),
        };

        let start = Instant::now();
        let response = client
            .send(DnsRequest::new(message.clone(), DnsRequestOptions::default()))
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No response from {server}"))?
            .with_context(|| format!("Failed to send DNS UPDATE to {server}"))?;

        Ok(Exchange {
            response: Message::clone(&response),
            rtt: start.elapsed(),
        })
    }
}

/// Resolve a `host[:port]` server entry; the port defaults to 53.
///
/// # Errors
///
/// Returns an error if the host cannot be resolved.
pub fn resolve_server(server: &str) -> Result<SocketAddr> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = server.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DNS_PORT));
    }

    let with_port = if server.contains(':') {
        server.to_string()
    } else {
        format!("{server}:{DNS_PORT}")
    };
    with_port
        .to_socket_addrs()
        .with_context(|| format!("Invalid server address: {server}"))?
        .next()
        .ok_or_else(|| anyhow!("Server address {server} did not resolve"))
}

#[cfg(test)]
#[path = "exchange_tests.rs"]
mod exchange_tests;
