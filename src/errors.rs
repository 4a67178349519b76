// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for dnsupdater.
//!
//! This module provides specialized error types for:
//! - Record validation (type exclusivity, empty values, malformed names)
//! - Configuration loading and validation
//! - RFC 2136 update transactions (GSS negotiation, transport, server rejection)
//!
//! Configuration errors are fatal before any network activity. Update errors are
//! scoped to a single server attempt; the update engine fails over to the next
//! server and only surfaces [`UpdateError::AllServersFailed`] once every server
//! has been tried.

use std::path::PathBuf;
use thiserror::Error;

/// Errors found while validating a single record definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// No record family (host, txt, mx, srv, cname) is populated
    #[error("must specify at least one type")]
    NoTypes,

    /// A CNAME was combined with another record family
    #[error("cannot have other records with CNAME")]
    CnameConflict,

    /// One of the TXT values is an empty string
    #[error("TXT must not be empty")]
    EmptyTxt,

    /// An MX entry has no exchange host
    #[error("MX record must have a MX")]
    MissingMxTarget,

    /// An SRV entry has no target host
    #[error("SRV record must have a target")]
    MissingSrvTarget,

    /// A record name or target is not a valid domain name
    #[error("invalid domain name '{name}': {reason}")]
    InvalidName {
        /// The offending name as written
        name: String,
        /// Parser message
        reason: String,
    },
}

/// Errors that abort configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration does not match the schema (unknown field, wrong type, ...)
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The server list is empty after environment overrides
    #[error("servers must not be empty")]
    NoServers,

    /// No zones are configured
    #[error("zones cannot be empty")]
    NoZones,

    /// A zone has no records
    #[error("zone '{zone}' has no records")]
    EmptyZone {
        /// Zone name as configured
        zone: String,
    },

    /// A record failed validation
    #[error("invalid record '{fqdn}': {source}")]
    InvalidRecord {
        /// Fully-qualified name of the record
        fqdn: String,
        /// What is wrong with it
        #[source]
        source: RecordError,
    },

    /// The GSS block is only partially filled in
    #[error("GSS {field} must not be empty")]
    IncompleteGss {
        /// First missing field (username, password or domain)
        field: &'static str,
    },

    /// Both a static TSIG key and GSS-TSIG are configured
    #[error("tsig and gss cannot both be configured")]
    ConflictingAuth,

    /// The static TSIG key is malformed
    #[error("invalid TSIG key '{name}': {reason}")]
    InvalidTsigKey {
        /// Key name as configured
        name: String,
        /// Explanation of what is invalid
        reason: String,
    },
}

/// Errors from a single RFC 2136 update transaction.
#[derive(Error, Debug, Clone)]
pub enum UpdateError {
    /// The zone name cannot be used as the update zone
    #[error("invalid zone name '{zone}': {reason}")]
    InvalidZone {
        /// Zone name as given
        zone: String,
        /// Parser message
        reason: String,
    },

    /// GSS-TSIG context negotiation failed
    #[error("GSS negotiation with {server} failed: {reason}")]
    Negotiation {
        /// Server the context was negotiated against
        server: String,
        /// Reason for the failure
        reason: String,
    },

    /// The transaction signature could not be attached
    #[error("failed to sign update for {server}: {reason}")]
    Signing {
        /// Server the message was destined for
        server: String,
        /// Reason for the failure
        reason: String,
    },

    /// The exchange did not complete (connection refused, timeout, ...)
    #[error("DNS exchange with {server} failed: {reason}")]
    Transport {
        /// Server that could not be reached
        server: String,
        /// Reason for the failure
        reason: String,
    },

    /// The server answered with a non-success response code
    #[error("DNS update for zone '{zone}' rejected by {server} with response code: {rcode}")]
    Rejected {
        /// Server that rejected the update
        server: String,
        /// Zone being updated
        zone: String,
        /// Response code returned by the server
        rcode: String,
    },

    /// The updater has no servers to try
    #[error("no servers configured")]
    NoServers,

    /// Every configured server failed; only the last failure is retained
    #[error("update of zone '{zone}' failed on all {attempts} server(s), last error: {last}")]
    AllServersFailed {
        /// Zone being updated
        zone: String,
        /// Number of servers tried
        attempts: usize,
        /// Failure of the last server tried, rendered in the message
        last: Box<UpdateError>,
    },
}

impl UpdateError {
    /// The failure of the last server attempt, looking through `AllServersFailed`.
    #[must_use]
    pub fn last_attempt(&self) -> &UpdateError {
        match self {
            Self::AllServersFailed { last, .. } => last.last_attempt(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
