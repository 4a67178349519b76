// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Transaction signatures for update messages.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hickory_client::op::Message;
use hickory_client::rr::rdata::tsig::{message_tbs, TsigAlgorithm, TSIG};
use hickory_client::rr::{DNSClass, Name, RData, Record as ResourceRecord};
use hickory_proto::rr::dnssec::rdata::DNSSECRData;
use hickory_proto::rr::dnssec::tsig::TSigner;
use std::str::FromStr;

use crate::config::{KeyAlgorithm, TsigKeyConfig};
use crate::constants::TSIG_FUDGE_TIME_SECS;

/// Build the GSS-TSIG record signing `message` with a negotiated key.
///
/// `generate_mac` receives the to-be-signed bytes (the message followed by
/// the TSIG variables) and returns the MIC computed by the GSS layer. The
/// message must not carry a TSIG record yet.
///
/// # Errors
///
/// Returns an error if `key_name` is not a valid domain name, the message
/// cannot be encoded, or `generate_mac` fails.
pub fn gss_tsig_record<F>(
    message: &Message,
    key_name: &str,
    now: u64,
    generate_mac: F,
) -> Result<ResourceRecord>
where
    F: FnOnce(&[u8]) -> Result<Vec<u8>>,
{
    let name =
        Name::from_str(key_name).with_context(|| format!("Invalid TSIG key name: {key_name}"))?;
    let fudge = u16::try_from(TSIG_FUDGE_TIME_SECS).unwrap_or(300);

    let pre_tsig = TSIG::new(
        TsigAlgorithm::Gss,
        now,
        fudge,
        Vec::new(),
        message.id(),
        0,
        Vec::new(),
    );
    let tbs = message_tbs(None, message, &pre_tsig, &name)
        .context("Failed to encode update message for signing")?;
    let mac = generate_mac(&tbs).context("Failed to generate GSS-TSIG MAC")?;

    let tsig = TSIG::new(
        TsigAlgorithm::Gss,
        now,
        fudge,
        mac,
        message.id(),
        0,
        Vec::new(),
    );
    let mut record = ResourceRecord::from_rdata(name, 0, RData::DNSSEC(DNSSECRData::TSIG(tsig)));
    record.set_dns_class(DNSClass::ANY);
    Ok(record)
}

/// Create a TSIG signer from a static key.
///
/// # Errors
///
/// Returns an error if the secret is not base64 or the key name is invalid.
pub fn create_tsig_signer(key: &TsigKeyConfig) -> Result<TSigner> {
    let algorithm = match key.algorithm {
        KeyAlgorithm::HmacMd5 => TsigAlgorithm::HmacMd5,
        KeyAlgorithm::HmacSha1 => TsigAlgorithm::HmacSha1,
        KeyAlgorithm::HmacSha224 => TsigAlgorithm::HmacSha224,
        KeyAlgorithm::HmacSha256 => TsigAlgorithm::HmacSha256,
        KeyAlgorithm::HmacSha384 => TsigAlgorithm::HmacSha384,
        KeyAlgorithm::HmacSha512 => TsigAlgorithm::HmacSha512,
    };

    let key_bytes = BASE64
        .decode(&key.secret)
        .context("Failed to decode TSIG key")?;

    TSigner::new(
        key_bytes,
        algorithm,
        Name::from_str(&key.name).context("Invalid TSIG key name")?,
        u16::try_from(TSIG_FUDGE_TIME_SECS).unwrap_or(300),
    )
    .context("Failed to create TSIG signer")
}

#[cfg(test)]
#[path = "tsig_tests.rs"]
mod tsig_tests;
