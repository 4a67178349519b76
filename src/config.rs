// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Configuration file model: servers, zones, records and update authentication.
//!
//! Loading happens in four steps, each of which can be driven separately:
//!
//! 1. Decode the YAML document ([`Config::from_yaml`]); unknown fields are rejected.
//! 2. Overlay environment variables ([`Config::apply_env_overrides`]).
//! 3. Propagate defaults ([`Config::init`]): zone names become fully qualified,
//!    zones without `default_ttl` get 3600 seconds, records get their FQDN and
//!    inherit the zone TTL when they set none.
//! 4. Validate the whole tree ([`Config::validate`]); the first failure wins.
//!
//! [`Config::load`] runs all four against a file and the process environment.
//!
//! # Example
//!
//! ```yaml
//! servers:
//!   - ns1.example.com
//!   - 192.0.2.53:5353
//! zones:
//!   example.com:
//!     default_ttl: 600
//!     records:
//!       "@":
//!         host: [192.0.2.1, "2001:db8::1"]
//!       www:
//!         cname: example.com
//!       _sip._tcp:
//!         srv:
//!           - { priority: 10, weight: 5, port: 5060, target: sip.example.com }
//! gss:
//!   username: svc-dns
//!   password: secret
//!   domain: EXAMPLE.COM
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{
    DEFAULT_ZONE_TTL_SECS, ENV_DNS_SERVERS, ENV_GSS_DOMAIN, ENV_GSS_PASSWORD, ENV_GSS_USERNAME,
    ZONE_APEX,
};
use crate::errors::ConfigError;
use crate::record::{fqdn, Record};
use crate::updater::gss::GssCredentials;

/// Root of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Servers to send updates to, tried in order (`host[:port]`)
    #[serde(default)]
    pub servers: Vec<String>,

    /// Zones keyed by zone name
    #[serde(default)]
    pub zones: BTreeMap<String, Zone>,

    /// GSS-TSIG settings; an empty block negotiates with the host credentials
    #[serde(default)]
    pub gss: Option<GssConfig>,

    /// Static TSIG key used to sign every update
    #[serde(default)]
    pub tsig: Option<TsigKeyConfig>,
}

/// A zone and the records to insert into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Zone {
    /// Fully-qualified zone name, filled in by [`Config::init`].
    #[serde(skip)]
    pub name: String,

    /// TTL for records that do not set one; 0 means the global default
    #[serde(default, alias = "ttl")]
    pub default_ttl: u32,

    /// Records keyed by owner label; `@` is the zone apex
    #[serde(default)]
    pub records: BTreeMap<String, Record>,
}

/// GSS-TSIG settings.
///
/// Either all fields are empty (negotiate with the host's own credentials)
/// or all of them are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GssConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub domain: String,
}

/// Static TSIG key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TsigKeyConfig {
    /// Key name as known to the server
    pub name: String,
    /// HMAC algorithm
    #[serde(default)]
    pub algorithm: KeyAlgorithm,
    /// Base64-encoded secret
    pub secret: String,
}

/// HMAC algorithms accepted for static TSIG keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyAlgorithm {
    HmacMd5,
    HmacSha1,
    HmacSha224,
    #[default]
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl KeyAlgorithm {
    /// Name of the algorithm as written in BIND key files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HmacMd5 => "hmac-md5",
            Self::HmacSha1 => "hmac-sha1",
            Self::HmacSha224 => "hmac-sha224",
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacSha384 => "hmac-sha384",
            Self::HmacSha512 => "hmac-sha512",
        }
    }
}

impl Config {
    /// Read, overlay, initialise and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded, or if the
    /// resulting configuration is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&contents)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.init();
        config.validate()?;
        Ok(config)
    }

    /// Decode a YAML document without applying defaults or validating.
    ///
    /// An empty document yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on unknown fields or mistyped values.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Option<Self> = serde_yaml::from_str(contents)?;
        Ok(config.unwrap_or_default())
    }

    /// Overlay values from the environment, read through `lookup`.
    ///
    /// `DNS_SERVERS` (newline separated) replaces the server list, and a
    /// non-empty `GSS_USERNAME` replaces the whole `gss` block together with
    /// `GSS_PASSWORD` and `GSS_DOMAIN`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(servers) = lookup(ENV_DNS_SERVERS) {
            let servers: Vec<String> = servers
                .lines()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if !servers.is_empty() {
                self.servers = servers;
            }
        }

        // Validation reports any of the remaining fields that are missing.
        if let Some(username) = lookup(ENV_GSS_USERNAME).filter(|u| !u.is_empty()) {
            self.gss = Some(GssConfig {
                username,
                password: lookup(ENV_GSS_PASSWORD).unwrap_or_default(),
                domain: lookup(ENV_GSS_DOMAIN).unwrap_or_default(),
            });
        }
    }

    /// Propagate zone names and TTL defaults down to every record.
    pub fn init(&mut self) {
        for (name, zone) in &mut self.zones {
            zone.init(name);
        }
    }

    /// Validate the configuration, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no servers or zones, if any zone or
    /// record is invalid, or if the authentication settings are incomplete.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::NoServers);
        }
        if self.zones.is_empty() {
            return Err(ConfigError::NoZones);
        }
        for zone in self.zones.values() {
            zone.validate()?;
        }
        if let Some(gss) = &self.gss {
            gss.validate()?;
        }
        if let Some(tsig) = &self.tsig {
            if self.gss.is_some() {
                return Err(ConfigError::ConflictingAuth);
            }
            tsig.validate()?;
        }
        Ok(())
    }
}

impl Zone {
    /// `zone_name` may or may not be fully qualified.
    pub(crate) fn init(&mut self, zone_name: &str) {
        self.name = fqdn(zone_name);
        if self.default_ttl == 0 {
            self.default_ttl = DEFAULT_ZONE_TTL_SECS;
        }
        for (key, record) in &mut self.records {
            record.init(record_fqdn(key, &self.name), self.default_ttl);
        }
    }

    /// Check that the zone has records and that each of them is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyZone`] or the first record failure, in key order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.records.is_empty() {
            return Err(ConfigError::EmptyZone {
                zone: self.name.clone(),
            });
        }
        for record in self.records.values() {
            record
                .validate()
                .map_err(|source| ConfigError::InvalidRecord {
                    fqdn: record.fqdn.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

impl GssConfig {
    /// Either every field is empty or every field is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::IncompleteGss`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() && self.password.is_empty() && self.domain.is_empty() {
            return Ok(());
        }
        if self.username.is_empty() {
            return Err(ConfigError::IncompleteGss { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ConfigError::IncompleteGss { field: "password" });
        }
        if self.domain.is_empty() {
            return Err(ConfigError::IncompleteGss { field: "domain" });
        }
        Ok(())
    }

    /// Explicit credentials, or `None` for host-based negotiation.
    #[must_use]
    pub fn credentials(&self) -> Option<GssCredentials> {
        if self.username.is_empty() {
            return None;
        }
        Some(GssCredentials {
            username: self.username.clone(),
            password: self.password.clone(),
            domain: self.domain.clone(),
        })
    }
}

impl TsigKeyConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTsigKey`] if the name is empty or the
    /// secret is not valid base64.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::InvalidTsigKey {
                name: self.name.clone(),
                reason: "key name must not be empty".to_string(),
            });
        }
        let secret = BASE64
            .decode(&self.secret)
            .map_err(|e| ConfigError::InvalidTsigKey {
                name: self.name.clone(),
                reason: format!("secret is not valid base64: {e}"),
            })?;
        if secret.is_empty() {
            return Err(ConfigError::InvalidTsigKey {
                name: self.name.clone(),
                reason: "secret must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// FQDN for a record key in a fully-qualified zone; `@` is the apex.
#[must_use]
pub fn record_fqdn(key: &str, zone_fqdn: &str) -> String {
    if key == ZONE_APEX {
        zone_fqdn.to_string()
    } else {
        format!("{key}.{zone_fqdn}")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
