// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#![warn(missing_docs)]
//! An ACME DNS-01 challenge hook. Certificate clients call `present` and
//! `cleanup` over HTTP; the challenge TXT record is published in a zone
//! hosted by a DNS provider.

#[cfg(feature = "challenge")]
/// Challenge value derivation, request normalization and record names.
pub mod challenge;
#[cfg(feature = "challenge")]
pub use challenge::*;

/// Types common to multiple modules.
pub mod common;
pub use common::*;

#[cfg(feature = "dns")]
/// A wrapper which provides access to DNS provider zone APIs.
pub mod dns;
#[cfg(feature = "dns")]
pub use dns::*;

#[cfg(feature = "log")]
/// Thread-safe logging.
pub mod log;
#[cfg(feature = "log")]
pub use log::*;

#[cfg(feature = "server")]
/// HTTP endpoints for ACME clients.
pub mod server;
#[cfg(feature = "server")]
pub use server::*;
