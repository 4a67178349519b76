// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! RFC 2136 record insertion with ordered server failover and GSS-TSIG.
//!
//! # Architecture
//!
//! [`Rfc2136Updater::insert`] sends one update message per call:
//! 1. Servers are tried in the configured order; the first success wins
//! 2. With GSS enabled, a transaction key is negotiated against the server
//!    being tried (with explicit credentials when all three are configured)
//! 3. The update section carries every given record as an insertion; a TSIG
//!    record whose MAC is computed by the negotiator for the negotiated key
//!    is attached
//! 4. The key is released after the exchange whatever its outcome
//! 5. If every server fails, the last failure is returned
//!
//! Network access goes through [`exchange::DnsExchanger`] and
//! [`gss::GssNegotiator`], so the failover and signing logic can be driven by
//! scripted collaborators.
//!
//! # Example
//!
//! ```rust,no_run
//! use dnsupdater::updater::{Rfc2136Updater, Updater};
//! use hickory_client::rr::{Name, RData, Record};
//! use std::net::Ipv4Addr;
//! use std::str::FromStr;
//!
//! # fn example() -> anyhow::Result<()> {
//! let updater = Rfc2136Updater::new(vec![
//!     "ns1.example.com".to_string(),
//!     "ns2.example.com".to_string(),
//! ]);
//!
//! let record = Record::from_rdata(
//!     Name::from_str("www.example.com.")?,
//!     3600,
//!     RData::A(Ipv4Addr::new(192, 0, 2, 1).into()),
//! );
//! updater.insert("example.com.", &[record])?;
//! # Ok(())
//! # }
//! ```

pub mod exchange;
pub mod gss;
pub mod tsig;

use hickory_client::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_client::rr::{DNSClass, Name, Record as ResourceRecord, RecordType};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

use crate::errors::UpdateError;
use crate::record::fqdn;
use exchange::{DnsExchanger, HickoryExchanger};
use gss::{GssCredentials, GssNegotiator, KeyRelease};

/// Inserts resource records into a zone.
pub trait Updater {
    /// Insert `records` into `zone` in a single update.
    ///
    /// # Errors
    ///
    /// Returns an error if the update could not be applied.
    fn insert(&self, zone: &str, records: &[ResourceRecord]) -> Result<(), UpdateError>;

    /// Release resources held by the updater.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing fails.
    fn close(&self) -> Result<(), UpdateError>;
}

/// RFC 2136 updater with ordered failover over a fixed server list.
pub struct Rfc2136Updater {
    servers: Vec<String>,
    exchanger: Arc<dyn DnsExchanger>,
    gss: Option<Arc<dyn GssNegotiator>>,
    credentials: Option<GssCredentials>,
}

impl std::fmt::Debug for Rfc2136Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rfc2136Updater")
            .field("servers", &self.servers)
            .field("gss", &self.gss.is_some())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Rfc2136Updater {
    /// Create an updater sending unsigned updates over TCP.
    ///
    /// `servers` should not be empty.
    #[must_use]
    pub fn new(servers: Vec<String>) -> Self {
        Self {
            servers,
            exchanger: Arc::new(HickoryExchanger::new()),
            gss: None,
            credentials: None,
        }
    }

    /// Replace the transport.
    #[must_use]
    pub fn with_exchanger(mut self, exchanger: Arc<dyn DnsExchanger>) -> Self {
        self.exchanger = exchanger;
        self
    }

    /// Sign updates with GSS-TSIG keys negotiated through `negotiator`.
    #[must_use]
    pub fn with_gss(mut self, negotiator: Arc<dyn GssNegotiator>) -> Self {
        self.gss = Some(negotiator);
        self
    }

    /// Negotiate with explicit credentials instead of the host's own.
    #[must_use]
    pub fn with_credentials(mut self, credentials: GssCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Servers in the order they are tried.
    #[must_use]
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Negotiate a transaction key for `server`, if GSS is enabled.
    fn transaction_key(&self, server: &str) -> Result<Option<KeyRelease<'_>>, UpdateError> {
        let Some(negotiator) = self.gss.as_deref() else {
            return Ok(None);
        };

        let negotiated = match self.credentials.as_ref().filter(|c| c.is_complete()) {
            Some(creds) => {
                debug!(server, username = %creds.username, domain = %creds.domain, "Negotiating GSS context with credentials");
                negotiator.negotiate_with_credentials(
                    server,
                    &creds.domain,
                    &creds.username,
                    &creds.password,
                )
            }
            None => {
                debug!(server, "Negotiating GSS context");
                negotiator.negotiate(server)
            }
        };

        let key = negotiated.map_err(|e| UpdateError::Negotiation {
            server: server.to_string(),
            reason: format!("{e:#}"),
        })?;
        Ok(Some(KeyRelease::new(negotiator, key)))
    }

    fn insert_one(
        &self,
        server: &str,
        zone: &Name,
        records: &[ResourceRecord],
    ) -> Result<(), UpdateError> {
        // Dropping the guard releases the key on every path below.
        let key = self.transaction_key(server)?;

        let mut message = update_message(zone, records);
        if let Some(key) = &key {
            let tsig = tsig::gss_tsig_record(&message, &key.key().name, unix_now(), |data| {
                key.generate_mac(data)
            })
            .map_err(|e| UpdateError::Signing {
                server: server.to_string(),
                reason: format!("{e:#}"),
            })?;
            message.add_tsig(tsig);
        }

        let exchange =
            self.exchanger
                .exchange(&message, server)
                .map_err(|e| UpdateError::Transport {
                    server: server.to_string(),
                    reason: format!("{e:#}"),
                })?;

        let rcode = exchange.response.response_code();
        if rcode != ResponseCode::NoError {
            return Err(UpdateError::Rejected {
                server: server.to_string(),
                zone: zone.to_string(),
                rcode: format!("{rcode:?}"),
            });
        }

        info!(
            server,
            zone = %zone,
            records = records.len(),
            rtt_ms = u64::try_from(exchange.rtt.as_millis()).unwrap_or(u64::MAX),
            "Update accepted"
        );
        Ok(())
    }
}

impl Updater for Rfc2136Updater {
    fn insert(&self, zone: &str, records: &[ResourceRecord]) -> Result<(), UpdateError> {
        let zone_name = Name::from_str(&fqdn(zone)).map_err(|e| UpdateError::InvalidZone {
            zone: zone.to_string(),
            reason: e.to_string(),
        })?;

        let mut last_error = None;
        for server in &self.servers {
            match self.insert_one(server, &zone_name, records) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(server = %server, zone = %zone_name, "Update attempt failed: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(UpdateError::AllServersFailed {
                zone: zone_name.to_string(),
                attempts: self.servers.len(),
                last: Box::new(last),
            }),
            None => Err(UpdateError::NoServers),
        }
    }

    fn close(&self) -> Result<(), UpdateError> {
        if let Some(negotiator) = &self.gss {
            negotiator.close().map_err(|e| UpdateError::Negotiation {
                server: String::new(),
                reason: format!("failed to close GSS negotiator: {e:#}"),
            })?;
        }
        Ok(())
    }
}

/// Build an update message inserting `records` into `zone`.
///
/// The zone section names `zone`/SOA; prerequisite and additional sections
/// are empty.
#[must_use]
pub fn update_message(zone: &Name, records: &[ResourceRecord]) -> Message {
    let mut zone_query = Query::new();
    zone_query
        .set_name(zone.clone())
        .set_query_class(DNSClass::IN)
        .set_query_type(RecordType::SOA);

    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Update)
        .set_recursion_desired(false);
    message.add_query(zone_query);
    message.add_name_servers(records.iter().cloned());
    message
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
