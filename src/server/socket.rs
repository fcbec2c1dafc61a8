// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::AppState;
use crate::common::{DnsManagerConfig, Error};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use structopt::StructOpt;
use toml::Value;

/// Command line options. Each one overrides the TOML file and environment.
#[derive(Debug, StructOpt)]
#[structopt(name = "dns-manager", about = "ACME DNS-01 challenge hook")]
pub struct Options {
    /// TOML file with `[hostinger]` and `[server]` sections.
    #[structopt(short, long)]
    pub config: Option<String>,

    /// Echo every request log line to stdout.
    #[structopt(short, long)]
    pub debug: bool,

    /// Listen address, e.g. 127.0.0.1 (default 0.0.0.0).
    #[structopt(long)]
    pub host: Option<String>,

    /// Listen port (default 8080).
    #[structopt(short, long)]
    pub port: Option<u16>,
}

impl Options {
    /// Build configuration from the TOML file (if any), the environment and
    /// then these options.
    pub fn load_config(&self) -> Result<DnsManagerConfig, Error> {
        let builder = DnsManagerConfig::builder().debug(self.debug);
        let builder = match &self.config {
            Some(file_name) => builder.toml_file(file_name),
            None => builder,
        };
        let mut config = builder.env().build()?;
        if let Some(host) = &self.host {
            config = config.with_value("server", "host", Value::String(host.clone()));
        }
        if let Some(port) = self.port {
            config = config.with_value("server", "port", Value::Integer(port.into()));
        }
        Ok(config)
    }
}

/// The `[server]` section.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,
    /// Fixed wait after a successful present; zero disables it.
    pub propagation_wait: Duration,
}

impl ServerConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    /// Read `[server] host`, `port` and `propagation_wait_secs`.
    pub fn new(config: &DnsManagerConfig) -> Result<Self, Error> {
        #[derive(Default, Deserialize)]
        struct ServerToml {
            host: Option<String>,
            port: Option<u16>,
            propagation_wait_secs: Option<u64>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            #[serde(default)]
            server: ServerToml,
        }
        let ConfigToml {
            server:
                ServerToml {
                    host,
                    port,
                    propagation_wait_secs,
                },
        } = config.get()?;
        let host = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let port = port.unwrap_or(Self::DEFAULT_PORT);
        // e.g. host = "127.0.0.1" or host = "[::1]"
        let addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|_| Error::Config(format!("{host}:{port}: invalid listen address")))?;
        Ok(Self {
            addr,
            propagation_wait: Duration::from_secs(propagation_wait_secs.unwrap_or(0)),
        })
    }
}

/// Run an `axum::Router` on incoming requests from a socket until SIGINT or
/// SIGTERM, then stop accepting and let in-flight requests finish.
pub async fn run_router_on_socket(
    router: Router,
    addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<(), Error> {
    println!("Begin running router on socket {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::String(format!("{addr}: {e}")))?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            println!("Shutting down");
            state.shutdown();
        })
        .await
        .map_err(|e| Error::String(format!("{e:?}")))?;
    println!("Done running router on socket");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            println!("cannot listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                println!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
