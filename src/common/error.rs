// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::{Display, Formatter};

#[derive(Debug, Eq, PartialEq)]
/// An enum that encapsulates the failures of challenge handling.
///
/// # Example
///
/// Error::DomainNotInZone(format!("_acme-challenge.{domain}"))
pub enum Error {
    /// Configuration is missing or unreadable (fatal at startup).
    Config(String),
    /// The fully qualified challenge name is outside the configured zone.
    DomainNotInZone(String),
    /// None of `keyAuthorization`, `token` or `value` was usable.
    MissingChallengeValue,
    /// A required request field was absent after checking every input source.
    MissingParameters(String),
    /// String error.
    String(String),
    /// The DNS provider failed, with its HTTP status (if any) and response text.
    Upstream(Option<u16>, String),
}

impl Error {
    /// Returns `true` if the caller sent bad input, as opposed to a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::DomainNotInZone(_) | Error::MissingChallengeValue | Error::MissingParameters(_)
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::Config(s) => Display::fmt(&format!("config: {s}"), f),
            Error::DomainNotInZone(fqdn) => Display::fmt(&format!("Invalid domain: {fqdn}"), f),
            Error::MissingChallengeValue => Display::fmt(
                "Missing challenge value (keyAuthorization, token or value)",
                f,
            ),
            Error::MissingParameters(s) => Display::fmt(&s, f),
            Error::String(s) => Display::fmt(&s, f),
            Error::Upstream(Some(status), body) => {
                Display::fmt(&format!("DNS provider returned {status}: {body}"), f)
            }
            Error::Upstream(None, body) => {
                Display::fmt(&format!("DNS provider request failed: {body}"), f)
            }
        }
    }
}

impl std::error::Error for Error {}
