// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::challenge::{resolve_record_name, ResolvedChallenge};
use crate::common::{DnsManagerConfig, Error};
use crate::log::StringLogger;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// The narrow slice of a DNS provider's zone API that challenges need.
#[async_trait]
pub trait ZoneApi {
    /// Read the records of the specified zone, in the provider's own format.
    async fn read_zone(&self, zone: &str) -> Result<Value, Error>;

    /// Replace whole record sets in the specified zone. With `overwrite`, each
    /// named set becomes exactly the given contents (an empty set removes it).
    async fn update_record_sets(
        &self,
        zone: &str,
        record_sets: Vec<TxtRecordSet>,
        overwrite: bool,
    ) -> Result<Value, Error>;

    /// Provider name.  For example, "hostinger".
    fn provider_name(&self) -> &'static str;
}

/// All TXT records sharing one name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TxtRecordSet {
    /// Relative to the zone.
    pub name: String,
    /// Seconds.
    pub ttl: u32,
    /// One TXT record per entry; empty means no records.
    pub contents: Vec<String>,
}

/// Publishes and withdraws challenge records in one zone.
///
/// Every call is a single synchronous provider request; nothing is retried
/// and nothing is cached, so concurrent calls for one name race at the
/// provider in arrival order.
#[derive(Clone)]
pub struct ChallengeZone {
    api: Arc<dyn ZoneApi + Send + Sync>,
    base_domain: String,
    ttl: u32,
}

impl ChallengeZone {
    /// TTL of challenge records unless configured otherwise.
    pub const TTL_SECS: u32 = 300;
    /// Zone used when none is configured.
    pub const DEFAULT_BASE_DOMAIN: &'static str = "hill90.com";

    /// Create a challenge zone from `[hostinger] base_domain` and `ttl`.
    pub fn new(
        config: &DnsManagerConfig,
        api: Arc<dyn ZoneApi + Send + Sync>,
    ) -> Result<Self, Error> {
        #[derive(Default, Deserialize)]
        struct ZoneConfig {
            base_domain: Option<String>,
            ttl: Option<u32>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            #[serde(default)]
            hostinger: ZoneConfig,
        }
        let ConfigToml {
            hostinger: ZoneConfig { base_domain, ttl },
        } = config.get()?;
        let base_domain = base_domain
            .map(|d| d.trim().trim_end_matches('.').to_string())
            .unwrap_or_else(|| Self::DEFAULT_BASE_DOMAIN.to_string());
        if base_domain.is_empty() {
            return Err(Error::Config("base domain is empty".to_string()));
        }
        Ok(Self::with_base_domain(
            api,
            &base_domain,
            ttl.filter(|ttl| *ttl > 0).unwrap_or(Self::TTL_SECS),
        ))
    }

    /// Create a challenge zone without reading configuration.
    pub fn with_base_domain(
        api: Arc<dyn ZoneApi + Send + Sync>,
        base_domain: &str,
        ttl: u32,
    ) -> Self {
        Self {
            api,
            base_domain: base_domain.to_string(),
            ttl,
        }
    }

    /// The configured zone, e.g. `hill90.com`.
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Name of the DNS provider behind this zone.
    pub fn provider_name(&self) -> &'static str {
        self.api.provider_name()
    }

    /// Map a fully qualified challenge name to a name in this zone.
    pub fn record_name(&self, fqdn: &str) -> Result<String, Error> {
        resolve_record_name(fqdn, &self.base_domain)
    }

    /// Resolve a fully qualified challenge name and pair it with its value.
    pub fn resolve(&self, fqdn: &str, value: String) -> Result<ResolvedChallenge, Error> {
        ResolvedChallenge::new(fqdn, &self.base_domain, value)
    }

    /// Publish `value` as the only TXT record named `record_name`, replacing
    /// whatever was there.
    pub async fn present(
        &self,
        record_name: &str,
        value: &str,
        logger: &StringLogger,
    ) -> Result<Value, Error> {
        logger.trace(format!(
            "zone {} upsert TXT {record_name} = {value} (ttl {})",
            self.base_domain, self.ttl
        ));
        let record_set = TxtRecordSet {
            name: record_name.to_string(),
            ttl: self.ttl,
            contents: vec![value.to_string()],
        };
        logger.call(
            format!("{} upsert {record_name}", self.api.provider_name()),
            self.api
                .update_record_sets(&self.base_domain, vec![record_set], true)
                .await,
        )
    }

    /// Remove every TXT record named `record_name`. Harmless if none exist.
    pub async fn cleanup(&self, record_name: &str, logger: &StringLogger) -> Result<Value, Error> {
        logger.trace(format!("zone {} clear TXT {record_name}", self.base_domain));
        let record_set = TxtRecordSet {
            name: record_name.to_string(),
            ttl: self.ttl,
            contents: Vec::new(),
        };
        logger.call(
            format!("{} clear {record_name}", self.api.provider_name()),
            self.api
                .update_record_sets(&self.base_domain, vec![record_set], true)
                .await,
        )
    }

    /// Read the whole zone from the provider.
    pub async fn read(&self, logger: &StringLogger) -> Result<Value, Error> {
        logger.call(
            format!("{} read {}", self.api.provider_name(), self.base_domain),
            self.api.read_zone(&self.base_domain).await,
        )
    }
}
