// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::Error;
use serde::Serialize;

/// A challenge ready for the zone: the record name relative to the base
/// domain, and the TXT content.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResolvedChallenge {
    /// For example, `_acme-challenge.portainer` in zone `hill90.com`.
    pub record_name: String,
    /// TXT record content.
    pub value: String,
}

/// Strip `"." + base_domain` from a fully qualified name.
///
/// Fails with `DomainNotInZone` unless the name ends with exactly that
/// suffix and something remains in front of it.
pub fn resolve_record_name(fqdn: &str, base_domain: &str) -> Result<String, Error> {
    let suffix = format!(".{base_domain}");
    match fqdn.strip_suffix(&suffix) {
        Some(record_name) if !record_name.is_empty() && !base_domain.is_empty() => {
            Ok(record_name.to_string())
        }
        _ => Err(Error::DomainNotInZone(fqdn.to_string())),
    }
}

impl ResolvedChallenge {
    /// Resolve `fqdn` against `base_domain` and pair it with `value`.
    pub fn new(fqdn: &str, base_domain: &str, value: String) -> Result<Self, Error> {
        Ok(Self {
            record_name: resolve_record_name(fqdn, base_domain)?,
            value,
        })
    }
}
