// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Strongly-typed identifiers used across the dispatch and worker paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Define a newtype identifier wrapping a [`Uuid`].
///
/// Generates `new()` (random v4), `nil()`, `as_uuid()`, `Display`,
/// `From<Uuid>` and `FromStr` so the id can move freely between JSON,
/// Redis keys and queue names without repeated `.to_string()` calls.
macro_rules! define_uuid_id {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mint a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The fixed zero UUID, used for `ENV=DEBUG` single-worker bring-up.
            pub fn nil() -> Self {
                Self(Uuid::nil())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_uuid_id! {
    /// Correlation id minted by Entry for one dispatched job; echoed
    /// verbatim by the Worker in its reply envelope.
    pub struct CorrelationId;
}

define_uuid_id! {
    /// Identity of a registered Worker; also the name of its job queue.
    pub struct WorkerId;
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
