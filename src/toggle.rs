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

use crate::client::{Endpoint, Transport};
use crate::error::ApiError;
use crate::model::ServiceStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    /// State the remote should be in once the toggle has been applied.
    pub fn target(&self) -> ServiceStatus {
        match self {
            Self::Enable => ServiceStatus::Enabled,
            Self::Disable => ServiceStatus::Disabled,
        }
    }

    fn endpoint(&self) -> Endpoint {
        match self {
            Self::Enable => Endpoint::Enable,
            Self::Disable => Endpoint::Disable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub previous: ServiceStatus,
    pub current: ServiceStatus,
    /// Whether the enable/disable call was sent at all.
    pub issued: bool,
}

/// Reads the remote status, sends the action only when it would change
/// something, then reads the status again and reports that.
///
/// The three calls are strictly sequential. The action's own response body
/// is never trusted for the resulting state.
pub fn apply<T: Transport + ?Sized>(
    transport: &T,
    toggle: Toggle,
) -> Result<ToggleOutcome, ApiError> {
    let previous = transport.status()?;
    if previous == toggle.target() {
        log::info!("Pi-hole already {previous}; not sending {:?}", toggle);
        return Ok(ToggleOutcome {
            previous,
            current: previous,
            issued: false,
        });
    }

    transport.fetch(toggle.endpoint())?;
    let current = transport.status()?;
    if current != toggle.target() {
        log::warn!(
            "Pi-hole is still {current} after {}; check the API token",
            toggle.endpoint()
        );
    }

    Ok(ToggleOutcome {
        previous,
        current,
        issued: true,
    })
}
