// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Present, cleanup, health and records endpoints.
mod routes;
/// Run an `axum::Router` on incoming requests from a socket.
mod socket;

pub use self::routes::{router, AppState};
pub use self::socket::{run_router_on_socket, Options, ServerConfig};
