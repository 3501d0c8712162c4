// pihole-stats - CLI for Pi-hole statistics and enable/disable control
// Copyright (C) 2024 pihole-stats contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use thiserror::Error;

/// Failures of the API core. None of them are recovered locally; they abort
/// the current operation and surface to the CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured admin URL could not be turned into a request URL.
    #[error("invalid Pi-hole URL `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Network/IO failure or a non-success HTTP status.
    #[error("{context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },
    /// The payload does not match the expected schema.
    #[error("decoding {what} response")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The payload decoded but carries a value outside the protocol.
    #[error("unrecognized Pi-hole status `{0}`")]
    Protocol(String),
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
