// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

#[cfg(test)]
mod dns_tests {
    use crate::common::{DnsManagerConfig, Error};
    use crate::dns::{ChallengeZone, TxtRecordSet, ZoneApi};
    use crate::log::StringLogger;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const BASE_DOMAIN: &str = "hill90.com";

    /// Keeps TXT record sets in memory, with the provider's whole-set semantics.
    #[derive(Default)]
    struct MemoryZone {
        calls: Mutex<usize>,
        records: Mutex<HashMap<String, Vec<String>>>,
    }

    impl MemoryZone {
        fn contents(&self, name: &str) -> Vec<String> {
            self.records
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl ZoneApi for MemoryZone {
        async fn read_zone(&self, zone: &str) -> Result<Value, Error> {
            assert_eq!(zone, BASE_DOMAIN);
            Ok(json!(*self.records.lock().unwrap()))
        }

        async fn update_record_sets(
            &self,
            zone: &str,
            record_sets: Vec<TxtRecordSet>,
            overwrite: bool,
        ) -> Result<Value, Error> {
            assert_eq!(zone, BASE_DOMAIN);
            *self.calls.lock().unwrap() += 1;
            let mut records = self.records.lock().unwrap();
            for TxtRecordSet { name, contents, .. } in record_sets {
                if overwrite {
                    if contents.is_empty() {
                        records.remove(&name);
                    } else {
                        records.insert(name, contents);
                    }
                } else {
                    records.entry(name).or_default().extend(contents);
                }
            }
            Ok(json!({ "message": "Request accepted" }))
        }

        fn provider_name(&self) -> &'static str {
            "memory"
        }
    }

    fn memory_zone() -> (Arc<MemoryZone>, ChallengeZone) {
        let api = Arc::new(MemoryZone::default());
        let zone = ChallengeZone::with_base_domain(api.clone(), BASE_DOMAIN, 300);
        (api, zone)
    }

    #[tokio::test]
    async fn present_then_cleanup_round_trip() {
        let (api, zone) = memory_zone();
        let logger = StringLogger::new(true);
        zone.present("_acme-challenge.portainer", "v1", &logger)
            .await
            .expect("present");
        assert_eq!(api.contents("_acme-challenge.portainer"), vec!["v1"]);
        zone.cleanup("_acme-challenge.portainer", &logger)
            .await
            .expect("cleanup");
        assert!(api.contents("_acme-challenge.portainer").is_empty());
        assert!(!logger.contains_warnings());
    }

    #[tokio::test]
    async fn present_overwrites() {
        let (api, zone) = memory_zone();
        let logger = StringLogger::default();
        zone.present("_acme-challenge.a", "first", &logger)
            .await
            .expect("present");
        zone.present("_acme-challenge.a", "second", &logger)
            .await
            .expect("present");
        assert_eq!(api.contents("_acme-challenge.a"), vec!["second"]);
    }

    #[tokio::test]
    async fn cleanup_when_absent_is_harmless() {
        let (api, zone) = memory_zone();
        let logger = StringLogger::default();
        zone.cleanup("_acme-challenge.never", &logger)
            .await
            .expect("cleanup");
        assert_eq!(*api.calls.lock().unwrap(), 1);
        assert_eq!(zone.read(&logger).await.expect("read"), json!({}));
    }

    #[test]
    fn zone_from_config() {
        let api: Arc<dyn ZoneApi + Send + Sync> = Arc::new(MemoryZone::default());
        let config = DnsManagerConfig::builder()
            .toml_str("[hostinger]\nbase_domain = \"example.org.\"\nttl = 60\n")
            .build()
            .expect("config");
        let zone = ChallengeZone::new(&config, api.clone()).expect("zone");
        assert_eq!(zone.base_domain(), "example.org");
        assert_eq!(
            zone.record_name("_acme-challenge.www.example.org"),
            Ok("_acme-challenge.www".to_string())
        );
        assert!(matches!(
            zone.resolve("_acme-challenge.www.hill90.com", "x".to_string()),
            Err(Error::DomainNotInZone(_))
        ));

        let config = DnsManagerConfig::builder().build().expect("empty config");
        let zone = ChallengeZone::new(&config, api).expect("default zone");
        assert_eq!(zone.base_domain(), ChallengeZone::DEFAULT_BASE_DOMAIN);
        assert_eq!(zone.provider_name(), "memory");
    }

    #[cfg(feature = "hostinger")]
    mod hostinger_tests {
        use super::BASE_DOMAIN;
        use crate::common::{DnsManagerConfig, Error};
        use crate::dns::{ChallengeZone, HostingerDns};
        use crate::log::StringLogger;
        use serde_json::json;
        use std::sync::Arc;
        use std::time::Duration;
        use wiremock::matchers::{body_json, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        fn zone(server: &MockServer) -> ChallengeZone {
            let api = HostingerDns::with_api_base("test-key", &server.uri(), Duration::from_secs(5))
                .expect("client");
            ChallengeZone::with_base_domain(Arc::new(api), BASE_DOMAIN, ChallengeZone::TTL_SECS)
        }

        #[tokio::test]
        async fn present_sends_single_record_upsert() {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/zones/hill90.com"))
                .and(header("authorization", "Bearer test-key"))
                .and(body_json(json!({
                    "zone": [{
                        "name": "_acme-challenge.portainer",
                        "type": "TXT",
                        "ttl": 300,
                        "records": [{ "content": "abc" }]
                    }],
                    "overwrite": true
                })))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({ "message": "Request accepted" })),
                )
                .expect(1)
                .mount(&server)
                .await;

            let result = zone(&server)
                .present("_acme-challenge.portainer", "abc", &StringLogger::default())
                .await
                .expect("present");
            assert_eq!(result, json!({ "message": "Request accepted" }));
        }

        #[tokio::test]
        async fn cleanup_sends_empty_overwrite() {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/zones/hill90.com"))
                .and(body_json(json!({
                    "zone": [{
                        "name": "_acme-challenge.portainer",
                        "type": "TXT",
                        "ttl": 300,
                        "records": []
                    }],
                    "overwrite": true
                })))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .expect(1)
                .mount(&server)
                .await;

            let result = zone(&server)
                .cleanup("_acme-challenge.portainer", &StringLogger::default())
                .await
                .expect("cleanup");
            assert_eq!(result, json!("ok"));
        }

        #[tokio::test]
        async fn provider_failure_is_upstream_error() {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/zones/hill90.com"))
                .respond_with(
                    ResponseTemplate::new(422).set_body_string(r#"{"message":"Invalid zone"}"#),
                )
                .mount(&server)
                .await;

            let logger = StringLogger::default();
            let result = zone(&server)
                .present("_acme-challenge.portainer", "abc", &logger)
                .await;
            assert_eq!(
                result,
                Err(Error::Upstream(
                    Some(422),
                    r#"{"message":"Invalid zone"}"#.to_string()
                ))
            );
            assert!(logger.contains_warnings());
        }

        #[tokio::test]
        async fn provider_timeout_is_upstream_error() {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
                .mount(&server)
                .await;

            let api = HostingerDns::with_api_base("k", &server.uri(), Duration::from_millis(200))
                .expect("client");
            let zone = ChallengeZone::with_base_domain(Arc::new(api), BASE_DOMAIN, 300);
            let result = zone
                .present("_acme-challenge.slow", "abc", &StringLogger::default())
                .await;
            assert!(matches!(result, Err(Error::Upstream(None, _))), "{result:?}");
        }

        #[tokio::test]
        async fn read_zone() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/zones/hill90.com"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    { "name": "@", "type": "A", "ttl": 300, "records": [{ "content": "1.2.3.4" }] }
                ])))
                .mount(&server)
                .await;

            let records = zone(&server)
                .read(&StringLogger::default())
                .await
                .expect("read");
            assert_eq!(records[0]["type"], "A");
        }

        #[tokio::test]
        async fn zero_timeout_uses_default() {
            let server = MockServer::start().await;
            Mock::given(method("PUT"))
                .and(path("/zones/hill90.com"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({ "message": "ok" }))
                        .set_delay(Duration::from_millis(50)),
                )
                .expect(1)
                .mount(&server)
                .await;

            let config = DnsManagerConfig::builder()
                .toml_string(format!(
                    "[hostinger]\napi_key = \"k\"\napi_base = \"{}\"\ntimeout_secs = 0\n",
                    server.uri()
                ))
                .build()
                .expect("config");
            let api = HostingerDns::new(&config).expect("api");
            let zone = ChallengeZone::with_base_domain(Arc::new(api), BASE_DOMAIN, 300);
            let result = zone
                .present("_acme-challenge.zero", "abc", &StringLogger::default())
                .await;
            assert_eq!(result, Ok(json!({ "message": "ok" })));
        }

        #[test]
        fn missing_api_key_is_fatal() {
            let config = DnsManagerConfig::builder()
                .toml_str("[hostinger]\nbase_domain = \"hill90.com\"\n")
                .build()
                .expect("config");
            assert!(matches!(HostingerDns::new(&config), Err(Error::Config(_))));

            let config = DnsManagerConfig::builder()
                .env_vars(vec![("HOSTINGER_API_KEY".to_string(), "secret".to_string())])
                .build()
                .expect("config");
            let api = HostingerDns::new(&config).expect("api key from env");
            assert_eq!(crate::dns::ZoneApi::provider_name(&api), "hostinger");
        }
    }
}
