// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Declarative record definitions and their wire-ready resource records.
//!
//! A [`Record`] describes the desired state of one owner name: any mix of
//! host addresses, TXT strings, MX and SRV entries, or a lone CNAME. Once the
//! owning zone has filled in the FQDN and TTL (see [`crate::config::Zone`]),
//! [`Record::records`] expands it into hickory resource records in a fixed
//! order: A/AAAA, TXT, MX, SRV, then CNAME.
//!
//! # Example
//!
//! ```rust
//! use dnsupdater::record::Record;
//!
//! let record = Record {
//!     fqdn: "www.example.com.".to_string(),
//!     host: vec!["192.0.2.1".parse().unwrap()],
//!     ttl: 300,
//!     ..Record::default()
//! };
//!
//! record.validate().unwrap();
//! assert_eq!(record.records().unwrap().len(), 1);
//! ```

use hickory_client::rr::{rdata, DNSClass, Name, RData, Record as ResourceRecord};
use serde::Deserialize;
use std::net::IpAddr;
use std::str::FromStr;

use crate::constants::MAX_TXT_CHUNK_LEN;
use crate::errors::RecordError;

/// Desired state of one owner name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Fully-qualified owner name, derived from the record key and zone.
    #[serde(skip)]
    pub fqdn: String,

    /// IPv4/IPv6 addresses, one A or AAAA record each
    #[serde(default)]
    pub host: Vec<IpAddr>,

    /// TXT values, one TXT record each
    #[serde(default)]
    pub txt: Vec<String>,

    /// Mail exchangers
    #[serde(default)]
    pub mx: Vec<MxRecord>,

    /// Service locations
    #[serde(default)]
    pub srv: Vec<SrvRecord>,

    /// Alias target; excludes every other family
    #[serde(default)]
    pub cname: Option<String>,

    /// TTL in seconds; 0 inherits the zone default
    #[serde(default)]
    pub ttl: u32,
}

/// One MX entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MxRecord {
    /// Lower is preferred
    #[serde(default)]
    pub preference: u16,
    /// Exchange host
    #[serde(default)]
    pub mx: String,
}

/// One SRV entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SrvRecord {
    /// Priority of the target host (lower is higher priority)
    #[serde(default)]
    pub priority: u16,
    /// Relative weight for records with the same priority
    #[serde(default)]
    pub weight: u16,
    /// TCP or UDP port on which the service is found
    #[serde(default)]
    pub port: u16,
    /// Canonical hostname of the machine providing the service
    #[serde(default)]
    pub target: String,
}

impl Record {
    /// Fix the owner name and inherit `default_ttl` when no TTL was given.
    pub(crate) fn init(&mut self, fqdn: String, default_ttl: u32) {
        self.fqdn = fqdn;
        if self.ttl == 0 {
            self.ttl = default_ttl;
        }
    }

    /// The CNAME target, treating an empty string as unset.
    #[must_use]
    pub fn cname(&self) -> Option<&str> {
        self.cname.as_deref().filter(|c| !c.is_empty())
    }

    /// Check that exactly one valid combination of record families is populated.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NoTypes`] when nothing is populated,
    /// [`RecordError::CnameConflict`] when a CNAME is combined with anything
    /// else, and a family-specific error for empty TXT values, MX/SRV entries
    /// without a target, or names that do not parse.
    pub fn validate(&self) -> Result<(), RecordError> {
        let mut families = 0;

        if !self.host.is_empty() {
            families += 1;
        }
        if !self.txt.is_empty() {
            families += 1;
            if self.txt.iter().any(String::is_empty) {
                return Err(RecordError::EmptyTxt);
            }
        }
        if !self.mx.is_empty() {
            families += 1;
            if self.mx.iter().any(|mx| mx.mx.is_empty()) {
                return Err(RecordError::MissingMxTarget);
            }
        }
        if !self.srv.is_empty() {
            families += 1;
            if self.srv.iter().any(|srv| srv.target.is_empty()) {
                return Err(RecordError::MissingSrvTarget);
            }
        }
        if self.cname().is_some() {
            families += 1;
        }

        if families == 0 {
            return Err(RecordError::NoTypes);
        }
        if self.cname().is_some() && families > 1 {
            return Err(RecordError::CnameConflict);
        }

        parse_name(&self.fqdn)?;
        for mx in &self.mx {
            parse_name(&mx.mx)?;
        }
        for srv in &self.srv {
            parse_name(&srv.target)?;
        }
        if let Some(cname) = self.cname() {
            parse_name(cname)?;
        }
        Ok(())
    }

    /// Expand into resource records: host, TXT, MX, SRV, then CNAME.
    ///
    /// Every TXT value becomes one record; values longer than 255 bytes are
    /// carried as several character-strings inside that record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidName`] if a name does not parse. This
    /// cannot happen for a record that passed [`Record::validate`].
    pub fn records(&self) -> Result<Vec<ResourceRecord>, RecordError> {
        let owner = parse_name(&self.fqdn)?;
        let mut records = Vec::with_capacity(
            self.host.len()
                + self.txt.len()
                + self.mx.len()
                + self.srv.len()
                + usize::from(self.cname().is_some()),
        );

        for ip in &self.host {
            let data = match ip {
                IpAddr::V4(v4) => RData::A((*v4).into()),
                IpAddr::V6(v6) => RData::AAAA((*v6).into()),
            };
            records.push(self.resource_record(&owner, data));
        }

        for value in &self.txt {
            let chunks = split_txt(value, MAX_TXT_CHUNK_LEN);
            records.push(self.resource_record(&owner, RData::TXT(rdata::TXT::from_bytes(chunks))));
        }

        for mx in &self.mx {
            let exchange = parse_name(&mx.mx)?;
            records.push(self.resource_record(
                &owner,
                RData::MX(rdata::MX::new(mx.preference, exchange)),
            ));
        }

        for srv in &self.srv {
            let target = parse_name(&srv.target)?;
            records.push(self.resource_record(
                &owner,
                RData::SRV(rdata::SRV::new(srv.priority, srv.weight, srv.port, target)),
            ));
        }

        if let Some(cname) = self.cname() {
            let target = parse_name(cname)?;
            records.push(self.resource_record(&owner, RData::CNAME(rdata::CNAME(target))));
        }

        Ok(records)
    }

    fn resource_record(&self, owner: &Name, data: RData) -> ResourceRecord {
        let mut record = ResourceRecord::from_rdata(owner.clone(), self.ttl, data);
        record.set_dns_class(DNSClass::IN);
        record
    }
}

/// Append the root label if `name` is not already fully qualified.
#[must_use]
pub fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Split `value` into consecutive chunks of at most `max` bytes.
///
/// Joining the chunks reproduces `value`; only the last chunk may be shorter
/// than `max`.
#[must_use]
pub fn split_txt(value: &str, max: usize) -> Vec<&[u8]> {
    value.as_bytes().chunks(max.max(1)).collect()
}

fn parse_name(name: &str) -> Result<Name, RecordError> {
    Name::from_str(&fqdn(name)).map_err(|e| RecordError::InvalidName {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
