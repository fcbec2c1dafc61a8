// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use dns_manager::{
    router, run_router_on_socket, AppState, ChallengeZone, Error, HostingerDns, Options,
    ServerConfig,
};
use std::process::ExitCode;
use std::sync::Arc;
use structopt::StructOpt;

async fn run(options: Options) -> Result<(), Error> {
    let config = options.load_config()?;
    // Without an API key nothing can work, so fail before accepting traffic.
    let api = HostingerDns::new(&config)?;
    let zone = ChallengeZone::new(&config, Arc::new(api))?;
    let ServerConfig {
        addr,
        propagation_wait,
    } = ServerConfig::new(&config)?;
    println!(
        "Serving DNS-01 challenges for {} via {} (propagation wait {}s)",
        zone.base_domain(),
        zone.provider_name(),
        propagation_wait.as_secs()
    );
    let state = Arc::new(AppState::new(zone, config.debug(), propagation_wait));
    run_router_on_socket(router(Arc::clone(&state)), addr, state).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Options::from_args()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("dns-manager: {e}");
            ExitCode::FAILURE
        }
    }
}
