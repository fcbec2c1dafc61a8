// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

/// Map a challenge name to a name relative to the zone.
mod record_name;
/// Merge request fields from body, query and form.
mod request;
/// Derive the TXT content.
mod value;

pub use self::record_name::{resolve_record_name, ResolvedChallenge};
pub use self::request::{
    describe_sources, normalize_cleanup, normalize_present, ChallengeRequest, InboundFields,
    ACME_CHALLENGE_LABEL,
};
pub use self::value::{derive_challenge_value, key_authorization_digest};
