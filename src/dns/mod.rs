// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Support for Hostinger
#[cfg(feature = "hostinger")]
mod hostinger;
/// Unit tests
mod tests;
/// Zone API trait and challenge record lifecycle
mod zone_api;

#[cfg(feature = "hostinger")]
pub use self::hostinger::HostingerDns;
pub use self::zone_api::{ChallengeZone, TxtRecordSet, ZoneApi};
