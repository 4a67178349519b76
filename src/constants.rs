// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for dnsupdater.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Standard DNS port, used when a server entry carries no port
pub const DNS_PORT: u16 = 53;

/// Default TTL for zones that do not set `default_ttl` (1 hour)
pub const DEFAULT_ZONE_TTL_SECS: u32 = 3600;

/// Maximum length of a single TXT character-string (RFC 1035 section 3.3)
pub const MAX_TXT_CHUNK_LEN: usize = 255;

/// Record key denoting the zone apex
pub const ZONE_APEX: &str = "@";

/// TSIG fudge time in seconds (allows for clock skew)
pub const TSIG_FUDGE_TIME_SECS: u64 = 300;

/// Timeout for a single update exchange with a server
pub const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Environment Overrides
// ============================================================================

/// Newline-separated server list replacing `servers`
pub const ENV_DNS_SERVERS: &str = "DNS_SERVERS";

/// GSS username; when set, replaces the `gss` block
pub const ENV_GSS_USERNAME: &str = "GSS_USERNAME";

/// GSS password
pub const ENV_GSS_PASSWORD: &str = "GSS_PASSWORD";

/// GSS (Kerberos) domain
pub const ENV_GSS_DOMAIN: &str = "GSS_DOMAIN";

// ============================================================================
// CLI Constants
// ============================================================================

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "records.yml";

/// Highest process exit code reported for failed insertions
pub const MAX_EXIT_CODE: usize = 125;
