// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # dnsupdater - RFC 2136 record insertion
//!
//! dnsupdater reads DNS records from a YAML file and inserts them into their
//! zones with RFC 2136 dynamic updates, trying each configured server in turn
//! and signing updates with GSS-TSIG or a static TSIG key.
//!
//! ## Modules
//!
//! - [`config`] - Record file loading, environment overrides and validation
//! - [`record`] - Record descriptions and conversion to resource records
//! - [`batch`] - Grouping of resource records into update transactions
//! - [`updater`] - Update messages, server failover and transaction signing
//! - [`runner`] - Zone-by-zone insertion with failure accounting
//! - [`errors`] - Error types
//! - [`constants`] - Shared defaults
//!
//! ## Example
//!
//! ```rust,no_run
//! use dnsupdater::config::Config;
//! use dnsupdater::runner::{build_updater, insert_zones, InsertOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::load("records.yml")?;
//! let updater = build_updater(&config)?;
//! let report = insert_zones(&updater, &config.zones, InsertOptions::default());
//! println!("{} updates applied, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod record;
pub mod runner;
pub mod updater;
