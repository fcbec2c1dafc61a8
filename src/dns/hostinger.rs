// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::{TxtRecordSet, ZoneApi};
use crate::common::{DnsManagerConfig, Error};
use async_trait::async_trait;
use hyper::{http::HeaderValue, HeaderMap};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// This struct implements `ZoneApi` for the Hostinger DNS API.
pub struct HostingerDns {
    api_base: String,
    client: Client,
}

impl HostingerDns {
    /// Public API endpoint.
    pub const DEFAULT_API_BASE: &'static str = "https://developers.hostinger.com/api/dns/v1";
    const TIMEOUT_SECS: u64 = 10;

    /// Create a `ZoneApi` for Hostinger. A missing API key is an error.
    pub fn new(config: &DnsManagerConfig) -> Result<Self, Error> {
        #[derive(Deserialize)]
        struct HostingerConfig {
            api_key: Option<String>,
            api_base: Option<String>,
            timeout_secs: Option<u64>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            hostinger: Option<HostingerConfig>,
        }
        let ConfigToml { hostinger } = config.get()?;
        let Some(HostingerConfig {
            api_key: Some(api_key),
            api_base,
            timeout_secs,
        }) = hostinger.filter(|h| h.api_key.as_deref().is_some_and(|k| !k.is_empty()))
        else {
            return Err(Error::Config(
                "HOSTINGER_API_KEY environment variable is required".to_string(),
            ));
        };
        let api_base = api_base
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_BASE.to_string());
        let timeout = Duration::from_secs(
            timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(Self::TIMEOUT_SECS),
        );
        Self::with_api_base(&api_key, &api_base, timeout)
    }

    /// Create a `ZoneApi` against an explicit endpoint.
    pub fn with_api_base(api_key: &str, api_base: &str, timeout: Duration) -> Result<Self, Error> {
        let mut default_headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::Config("API key is not a valid header value".to_string()))?;
        authorization.set_sensitive(true);
        default_headers.insert(reqwest::header::AUTHORIZATION, authorization);
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(concat!("dns-manager/", env!("CARGO_PKG_VERSION"))),
        );
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn zone_endpoint(&self, zone: &str) -> String {
        format!("{}/zones/{zone}", self.api_base)
    }

    /// Success bodies are returned as JSON, or as a JSON string if they are
    /// not JSON. Any other status becomes `Error::Upstream` with the body text.
    async fn parse_response(response: Response) -> Result<Value, Error> {
        let status = response.status();
        let text = response.text().await.map_err(Error::from_reqwest)?;
        if status.is_success() {
            if text.trim().is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            }
        } else {
            Err(Error::Upstream(Some(status.as_u16()), text))
        }
    }
}

#[async_trait]
impl ZoneApi for HostingerDns {
    async fn read_zone(&self, zone: &str) -> Result<Value, Error> {
        let response = self
            .client
            .get(self.zone_endpoint(zone))
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        Self::parse_response(response).await
    }

    async fn update_record_sets(
        &self,
        zone: &str,
        record_sets: Vec<TxtRecordSet>,
        overwrite: bool,
    ) -> Result<Value, Error> {
        let body = HostingerZoneUpdate {
            zone: record_sets
                .into_iter()
                .map(|TxtRecordSet { name, ttl, contents }| HostingerRecordSet {
                    name,
                    record_type: HostingerRecordType::Txt,
                    ttl,
                    records: contents
                        .into_iter()
                        .map(|content| HostingerRecord { content })
                        .collect(),
                })
                .collect(),
            overwrite,
        };
        let response = self
            .client
            .put(self.zone_endpoint(zone))
            .json(&body)
            .send()
            .await
            .map_err(Error::from_reqwest)?;
        Self::parse_response(response).await
    }

    fn provider_name(&self) -> &'static str {
        "hostinger"
    }
}

#[derive(Debug, Serialize)]
struct HostingerZoneUpdate {
    zone: Vec<HostingerRecordSet>,
    overwrite: bool,
}

#[derive(Debug, Serialize)]
struct HostingerRecordSet {
    name: String,
    #[serde(rename = "type")]
    record_type: HostingerRecordType,
    ttl: u32,
    records: Vec<HostingerRecord>,
}

#[derive(Debug, Serialize)]
struct HostingerRecord {
    content: String,
}

#[derive(Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum HostingerRecordType {
    Txt,
}
