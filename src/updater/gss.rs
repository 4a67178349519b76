// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! GSS-TSIG transaction key negotiation.
//!
//! The GSS-API work (TKEY exchange, Kerberos tickets, MIC computation) is
//! provided by an implementation of [`GssNegotiator`]. The update engine
//! decides which negotiation to run and for which server, builds the bytes to
//! be signed, and guarantees that every negotiated key is released again.

use anyhow::Result;
use std::time::SystemTime;
use tracing::debug;

/// A transaction key negotiated with one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionKey {
    /// Key name, used as the owner of the TSIG record
    pub name: String,
    /// When the security context expires
    pub expires: SystemTime,
}

/// Explicit credentials for GSS negotiation.
#[derive(Clone, PartialEq, Eq)]
pub struct GssCredentials {
    pub username: String,
    pub password: String,
    pub domain: String,
}

impl GssCredentials {
    /// All three fields are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty() && !self.domain.is_empty()
    }
}

impl std::fmt::Debug for GssCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GssCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("domain", &self.domain)
            .finish()
    }
}

/// Negotiates and releases GSS-TSIG security contexts.
///
/// A context is bound to the server it was negotiated with.
pub trait GssNegotiator: Send + Sync {
    /// Negotiate a context with `server` using explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails.
    fn negotiate_with_credentials(
        &self,
        server: &str,
        domain: &str,
        username: &str,
        password: &str,
    ) -> Result<TransactionKey>;

    /// Negotiate a context with `server` using the host's own credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the handshake fails.
    fn negotiate(&self, server: &str) -> Result<TransactionKey>;

    /// Compute the MIC over `data` with the context behind `key`.
    ///
    /// `data` is the to-be-signed form of an update message followed by its
    /// TSIG variables; the result is used as the TSIG MAC.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the GSS layer cannot sign.
    fn generate_mac(&self, key: &str, data: &[u8]) -> Result<Vec<u8>>;

    /// Release the context behind `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown.
    fn delete_context(&self, key: &str) -> Result<()>;

    /// Release every remaining context and the underlying GSS state.
    ///
    /// # Errors
    ///
    /// Returns an error if shutting down the GSS layer fails.
    fn close(&self) -> Result<()>;
}

/// Releases a negotiated key when dropped.
pub(crate) struct KeyRelease<'a> {
    negotiator: &'a dyn GssNegotiator,
    key: TransactionKey,
}

impl<'a> KeyRelease<'a> {
    pub(crate) fn new(negotiator: &'a dyn GssNegotiator, key: TransactionKey) -> Self {
        Self { negotiator, key }
    }

    pub(crate) fn key(&self) -> &TransactionKey {
        &self.key
    }

    /// Sign `data` with the held key.
    pub(crate) fn generate_mac(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.negotiator.generate_mac(&self.key.name, data)
    }
}

impl Drop for KeyRelease<'_> {
    fn drop(&mut self) {
        // The only failure is an unknown key, i.e. the context is already gone.
        if let Err(e) = self.negotiator.delete_context(&self.key.name) {
            debug!(key = %self.key.name, "Ignoring GSS context release failure: {e:#}");
        }
    }
}
