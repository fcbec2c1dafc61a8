// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::Error;
use base64::{engine::general_purpose, Engine as _};
use sha2::{Digest, Sha256};

/// The DNS-01 TXT content for a key authorization: the SHA-256 digest,
/// base 64 encoded with the URL safe alphabet and no `=` padding.
pub fn key_authorization_digest(key_authorization: &str) -> String {
    let digest = Sha256::digest(key_authorization.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(digest)
}

/// Choose the TXT content to publish. A key authorization is hashed; a token or
/// a precomputed value is published verbatim. Empty strings count as absent.
pub fn derive_challenge_value(
    key_authorization: Option<&str>,
    token: Option<&str>,
    value: Option<&str>,
) -> Result<String, Error> {
    if let Some(key_authorization) = non_empty(key_authorization) {
        Ok(key_authorization_digest(key_authorization))
    } else if let Some(token) = non_empty(token) {
        Ok(token.to_string())
    } else if let Some(value) = non_empty(value) {
        Ok(value.to_string())
    } else {
        Err(Error::MissingChallengeValue)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
