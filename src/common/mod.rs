// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(feature = "toml")]
mod config;
/// An enum that encapsulates a variety of error types.
mod error;
#[cfg(feature = "dns")]
mod http;

#[cfg(feature = "toml")]
pub use self::config::{DnsManagerConfig, DnsManagerConfigBuilder};
pub use self::error::Error;
#[cfg(feature = "dns")]
pub use self::http::create_error_response;
