// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::derive_challenge_value;
use crate::common::Error;
use serde_json::Value;
use std::collections::HashMap;

/// Label that every DNS-01 challenge name starts with.
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Domain,
    KeyAuthorization,
    Token,
    Value,
}

// Within one source, earlier aliases win.
const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (Field::Domain, &["domain", "fqdn"]),
    (Field::KeyAuthorization, &["keyAuthorization", "keyAuth"]),
    (Field::Token, &["token"]),
    (Field::Value, &["value"]),
];

/// Flat string fields taken from one part of an inbound request.
#[derive(Clone, Debug, Default)]
pub struct InboundFields {
    source: &'static str,
    fields: HashMap<String, String>,
}

impl InboundFields {
    /// Fields from arbitrary `(name, value)` pairs. The first non-empty value
    /// of a repeated name is kept.
    pub fn new<K, V, I>(source: &'static str, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut fields = HashMap::new();
        for (k, v) in pairs {
            let v = v.into();
            if !v.is_empty() {
                fields.entry(k.into()).or_insert(v);
            }
        }
        Self { source, fields }
    }

    /// String members of a JSON object body. Returns `None` if the body is not
    /// a JSON object. Non-string members are ignored.
    pub fn from_json(body: &[u8]) -> Option<Self> {
        match serde_json::from_slice::<Value>(body).ok()? {
            Value::Object(map) => Some(Self::new(
                "json body",
                map.into_iter().filter_map(|(k, v)| match v {
                    Value::String(s) => Some((k, s)),
                    _ => None,
                }),
            )),
            _ => None,
        }
    }

    /// Parameters of a URL query string (without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        Self::new(
            "query string",
            url::form_urlencoded::parse(query.as_bytes()).into_owned(),
        )
    }

    /// Fields of an `application/x-www-form-urlencoded` body.
    pub fn from_form(body: &[u8]) -> Self {
        Self::new("form body", url::form_urlencoded::parse(body).into_owned())
    }

    /// A body that was read but is neither a JSON object nor a form. It
    /// contributes no fields but still shows up in diagnostics.
    pub fn unparsed_body() -> Self {
        Self::new("body (not a JSON object or form)", Vec::<(String, String)>::new())
    }

    /// Where these fields came from, for diagnostics.
    pub fn source(&self) -> &'static str {
        self.source
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// The raw fields of a present or cleanup call, after merging every source.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChallengeRequest {
    /// As sent; see `challenge_domain` for the normalized form.
    pub domain: Option<String>,
    /// ACME key authorization (`token.thumbprint`), hashed before publishing.
    pub key_authorization: Option<String>,
    /// Published verbatim.
    pub token: Option<String>,
    /// Published verbatim.
    pub value: Option<String>,
}

impl ChallengeRequest {
    /// Merge sources given in priority order. Each field takes the first
    /// non-empty match; later sources only fill fields still empty.
    pub fn from_sources(sources: &[InboundFields]) -> Self {
        let mut request = Self::default();
        for (field, aliases) in FIELD_ALIASES {
            let found = sources.iter().find_map(|source| {
                aliases
                    .iter()
                    .find_map(|alias| source.get(alias))
                    .map(str::to_string)
            });
            let slot = match field {
                Field::Domain => &mut request.domain,
                Field::KeyAuthorization => &mut request.key_authorization,
                Field::Token => &mut request.token,
                Field::Value => &mut request.value,
            };
            *slot = found;
        }
        request
    }

    /// The fully qualified challenge name. A bare domain gets the
    /// `_acme-challenge.` label prepended; a trailing root dot is dropped.
    pub fn challenge_domain(&self) -> Option<String> {
        let domain = self.domain.as_deref()?.trim().trim_end_matches('.');
        if domain.is_empty() {
            None
        } else if domain.starts_with(ACME_CHALLENGE_LABEL) {
            Some(domain.to_string())
        } else {
            Some(format!("{ACME_CHALLENGE_LABEL}.{domain}"))
        }
    }

    /// The TXT content to publish.
    pub fn challenge_value(&self) -> Result<String, Error> {
        derive_challenge_value(
            self.key_authorization.as_deref(),
            self.token.as_deref(),
            self.value.as_deref(),
        )
    }
}

/// Normalize a present call into `(fqdn, value)`.
pub fn normalize_present(sources: &[InboundFields]) -> Result<(String, String), Error> {
    let request = ChallengeRequest::from_sources(sources);
    let domain = request.challenge_domain();
    let value = request.challenge_value().ok();
    match (domain, value) {
        (Some(domain), Some(value)) => Ok((domain, value)),
        (None, None) => Err(missing("domain and keyAuthorization, token or value", sources)),
        (None, Some(_)) => Err(missing("domain", sources)),
        (Some(_), None) => Err(missing("keyAuthorization, token or value", sources)),
    }
}

/// Normalize a cleanup call into the fully qualified challenge name.
pub fn normalize_cleanup(sources: &[InboundFields]) -> Result<String, Error> {
    ChallengeRequest::from_sources(sources)
        .challenge_domain()
        .ok_or_else(|| missing("domain", sources))
}

/// Comma separated source names, or `no input`.
pub fn describe_sources(sources: &[InboundFields]) -> String {
    if sources.is_empty() {
        "no input".to_string()
    } else {
        sources
            .iter()
            .map(InboundFields::source)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn missing(what: &str, sources: &[InboundFields]) -> Error {
    Error::MissingParameters(format!(
        "Missing {what} (inspected: {})",
        describe_sources(sources)
    ))
}
