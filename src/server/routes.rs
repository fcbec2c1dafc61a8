// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::challenge::{
    describe_sources, normalize_cleanup, normalize_present, InboundFields, ResolvedChallenge,
};
use crate::common::Error;
use crate::dns::ChallengeZone;
use crate::log::StringLogger;
use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hyper::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Shared by every request. Only the provider client inside `zone` is used
/// concurrently; there is no per-request mutable state here.
pub struct AppState {
    debug: bool,
    propagation_wait: Duration,
    shutdown: watch::Sender<bool>,
    zone: ChallengeZone,
}

impl AppState {
    /// Upper bound for the post-present propagation wait.
    pub const MAX_PROPAGATION_WAIT_SECS: u64 = 300;

    /// Create the state. A zero `propagation_wait` disables the wait.
    pub fn new(zone: ChallengeZone, debug: bool, propagation_wait: Duration) -> Self {
        Self {
            debug,
            propagation_wait: propagation_wait
                .min(Duration::from_secs(Self::MAX_PROPAGATION_WAIT_SECS)),
            shutdown: watch::channel(false).0,
            zone,
        }
    }

    /// Cut short any propagation waits in progress (and any that start later).
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    async fn wait_for_propagation(&self, logger: &StringLogger) {
        if self.propagation_wait.is_zero() {
            return;
        }
        logger.trace(format!(
            "waiting {} seconds for DNS propagation",
            self.propagation_wait.as_secs()
        ));
        let mut shutdown = self.shutdown.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(self.propagation_wait) => {}
            _ = shutdown.wait_for(|stopping| *stopping) => {
                logger.trace("propagation wait cut short by shutdown".to_string());
            }
        }
    }
}

/// Create the `axum::Router` with the challenge endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/present", post(present))
        .route("/cleanup", post(cleanup))
        .route("/health", get(health))
        .route("/records", get(records))
        .with_state(state)
}

/// Input sources in priority order: JSON body, query string, form body.
fn inbound_sources(
    query: Option<String>,
    headers: &HeaderMap,
    body: &Bytes,
) -> Vec<InboundFields> {
    let mut sources = Vec::with_capacity(3);
    let json = InboundFields::from_json(body);
    let body_parsed = json.is_some();
    if let Some(json) = json {
        sources.push(json);
    }
    if let Some(query) = query {
        sources.push(InboundFields::from_query(&query));
    }
    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        sources.push(InboundFields::from_form(body));
    } else if !body_parsed && !body.is_empty() {
        sources.push(InboundFields::unparsed_body());
    }
    sources
}

fn respond(result: Result<Value, Error>, logger: &StringLogger) -> Response {
    match result {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "status": "success", "result": result })),
        )
            .into_response(),
        Err(e) => {
            logger.warn(format!("request failed: {e}"));
            e.into_response()
        }
    }
}

async fn present(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let logger = StringLogger::labeled(state.debug, "present");
    let result = async {
        let sources = inbound_sources(query, &headers, &body);
        logger.trace(format!("inspected: {}", describe_sources(&sources)));
        let (fqdn, value) = normalize_present(&sources)?;
        let ResolvedChallenge { record_name, value } = state.zone.resolve(&fqdn, value)?;
        logger.trace(format!("{fqdn} -> TXT {record_name} = {value}"));
        let result = state.zone.present(&record_name, &value, &logger).await?;
        state.wait_for_propagation(&logger).await;
        Ok::<_, Error>(result)
    }
    .await;
    respond(result, &logger)
}

async fn cleanup(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let logger = StringLogger::labeled(state.debug, "cleanup");
    let result = async {
        let sources = inbound_sources(query, &headers, &body);
        logger.trace(format!("inspected: {}", describe_sources(&sources)));
        let fqdn = normalize_cleanup(&sources)?;
        let record_name = state.zone.record_name(&fqdn)?;
        logger.trace(format!("{fqdn} -> TXT {record_name}"));
        state.zone.cleanup(&record_name, &logger).await
    }
    .await;
    respond(result, &logger)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn records(State(state): State<Arc<AppState>>) -> Response {
    let logger = StringLogger::labeled(state.debug, "records");
    let result = state.zone.read(&logger).await;
    respond(result, &logger)
}
