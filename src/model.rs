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

//! Typed views of the `api.php` summary and status payloads.
//!
//! Counters are kept as text exactly as the API sends them. Numeric parsing
//! happens at the point of use (see [`RelativeAge::parse`]).

use crate::error::ApiError;
use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// One decoded `?summary` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(default, deserialize_with = "text")]
    pub unique_clients: String,
    #[serde(default, deserialize_with = "text")]
    pub clients_ever_seen: String,
    #[serde(default, deserialize_with = "text")]
    pub domains_being_blocked: String,
    #[serde(default, deserialize_with = "text")]
    pub ads_blocked_today: String,
    #[serde(default, deserialize_with = "text")]
    pub ads_percentage_today: String,
    #[serde(default, deserialize_with = "text")]
    pub dns_queries_today: String,
    #[serde(default, deserialize_with = "text")]
    pub queries_cached: String,
    #[serde(default, deserialize_with = "text")]
    pub queries_forwarded: String,
    #[serde(default, deserialize_with = "text")]
    pub unique_domains: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity_last_updated: Option<GravityStatus>,
}

impl StatisticsSnapshot {
    /// Age of the blocklist, only when the gravity file exists.
    pub fn gravity_age(&self) -> Option<&RelativeAge> {
        self.gravity_last_updated.as_ref().and_then(GravityStatus::age)
    }
}

/// State of the blocklist ("gravity") database file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGravity")]
pub struct GravityStatus {
    pub file_exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative: Option<RelativeAge>,
}

impl GravityStatus {
    pub fn age(&self) -> Option<&RelativeAge> {
        if self.file_exists {
            self.relative.as_ref()
        } else {
            None
        }
    }
}

/// Age fields stay untyped until `file_exists` says they mean something.
#[derive(Deserialize)]
struct RawGravity {
    #[serde(default)]
    file_exists: bool,
    #[serde(default)]
    absolute: Option<Value>,
    #[serde(default)]
    relative: Option<Value>,
}

impl TryFrom<RawGravity> for GravityStatus {
    type Error = serde_json::Error;

    fn try_from(raw: RawGravity) -> Result<Self, Self::Error> {
        if !raw.file_exists {
            return Ok(Self::default());
        }
        Ok(Self {
            file_exists: true,
            absolute: raw.absolute.map(serde_json::from_value).transpose()?,
            relative: raw.relative.map(serde_json::from_value).transpose()?,
        })
    }
}

/// Time since the last gravity update, as sent by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeAge {
    #[serde(default, deserialize_with = "text")]
    pub days: String,
    #[serde(default, deserialize_with = "text")]
    pub hours: String,
    #[serde(default, deserialize_with = "text")]
    pub minutes: String,
}

impl RelativeAge {
    /// Numeric view of the age; fails on any non-integer field.
    pub fn parse(&self) -> Result<GravityAge, ParseIntError> {
        Ok(GravityAge {
            days: self.days.parse()?,
            hours: self.hours.parse()?,
            minutes: self.minutes.parse()?,
        })
    }
}

/// Parsed gravity age, displayed as "D days, H hours, M minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GravityAge {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl fmt::Display for GravityAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} days, {} hours, {} minutes",
            self.days, self.hours, self.minutes
        )
    }
}

/// Whether blocking is active on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Enabled,
    Disabled,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = ApiError;

    /// Exact, case-sensitive match against the two literals the API uses.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            other => Err(ApiError::Protocol(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct RawStatus {
    status: String,
}

pub fn parse_statistics(bytes: &[u8]) -> Result<StatisticsSnapshot, ApiError> {
    decode_object(bytes, "summary")
}

pub fn parse_status(bytes: &[u8]) -> Result<ServiceStatus, ApiError> {
    let raw: RawStatus = decode_object(bytes, "status")?;
    raw.status.parse()
}

/// Decodes `bytes` as a JSON object into `T`. Anything other than an object
/// (the API answers `[]` to unauthorized calls) is a decode failure.
fn decode_object<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, ApiError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|source| ApiError::Decode { what, source })?;
    if !value.is_object() {
        let source =
            <serde_json::Error as de::Error>::invalid_type(unexpected(&value), &"a JSON object");
        return Err(ApiError::Decode { what, source });
    }
    serde_json::from_value(value).map_err(|source| ApiError::Decode { what, source })
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Accepts a JSON string or number and keeps it as text.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })
}
