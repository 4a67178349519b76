// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Insertion driver: turns configured zones into update transactions.

use anyhow::{bail, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::batch::plan_batches;
use crate::config::{Config, Zone};
use crate::constants::MAX_EXIT_CODE;
use crate::updater::exchange::HickoryExchanger;
use crate::updater::{Rfc2136Updater, Updater};

/// Options for [`insert_zones`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOptions {
    /// Records per update; 0 sends one update per configured record
    pub batch_size: usize,
    /// Stop at the first failed update
    pub exit_on_error: bool,
}

/// Outcome of [`insert_zones`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// Updates that were sent successfully
    pub succeeded: usize,
    /// Updates that failed
    pub failed: usize,
    /// The run stopped early because of `exit_on_error`
    pub aborted: bool,
}

impl InsertReport {
    /// Process exit code for this run.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.aborted {
            return 1;
        }
        exit_code(self.failed)
    }
}

/// Build the production updater for a validated configuration.
///
/// A static `tsig` key signs every update. GSS-TSIG needs a
/// [`crate::updater::gss::GssNegotiator`] backend, which this binary does not
/// bundle; embedders attach one with [`Rfc2136Updater::with_gss`].
///
/// # Errors
///
/// Returns an error if the TSIG key cannot be turned into a signer or if GSS
/// is configured.
pub fn build_updater(config: &Config) -> Result<Rfc2136Updater> {
    let mut exchanger = HickoryExchanger::new();
    if let Some(key) = &config.tsig {
        exchanger = exchanger.with_tsig_key(key)?;
    }
    if config.gss.is_some() {
        bail!("GSS-TSIG is configured but no GSS-API negotiator is available in this build");
    }
    Ok(Rfc2136Updater::new(config.servers.clone()).with_exchanger(Arc::new(exchanger)))
}

/// Insert every record of every zone, zone by zone in name order.
///
/// Failed updates are logged and counted; the next batch is still attempted
/// unless `exit_on_error` is set.
pub fn insert_zones(
    updater: &dyn Updater,
    zones: &BTreeMap<String, Zone>,
    options: InsertOptions,
) -> InsertReport {
    let mut report = InsertReport::default();

    for (zone_key, zone) in zones {
        let zone_name = if zone.name.is_empty() {
            zone_key.as_str()
        } else {
            zone.name.as_str()
        };
        info!(zone = zone_name, batch_size = options.batch_size, "Inserting records");

        let mut record_sets = Vec::with_capacity(zone.records.len());
        for record in zone.records.values() {
            match record.records() {
                Ok(set) => record_sets.push(set),
                Err(e) => {
                    error!(zone = zone_name, fqdn = %record.fqdn, "Error building records: {e}");
                    report.failed += 1;
                    if options.exit_on_error {
                        report.aborted = true;
                        return report;
                    }
                }
            }
        }

        for batch in plan_batches(record_sets, options.batch_size) {
            let first = batch
                .first()
                .map(|r| r.name().to_string())
                .unwrap_or_default();
            match updater.insert(zone_name, &batch) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    error!(zone = zone_name, fqdn = %first, records = batch.len(), "Error inserting records: {e}");
                    report.failed += 1;
                    if options.exit_on_error {
                        report.aborted = true;
                        return report;
                    }
                }
            }
        }
    }

    report
}

/// Exit code for `failed` insertions, capped at 125.
#[must_use]
pub fn exit_code(failed: usize) -> u8 {
    u8::try_from(failed.min(MAX_EXIT_CODE)).unwrap_or(u8::MAX)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod runner_tests;
