#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use expedition_core::ExpeditionConfig;
use serde::{Deserialize, Serialize};

const CODE_DOMAIN: &str = "expedition";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded progress payload.
pub(crate) const CODE_HEADER: &str = "expedition:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Single-line resume code a chat bot can hand to the player.
///
/// The code carries the configuration and the level reached, which is enough
/// to restart the level with identical generation. It deliberately omits the
/// player position and consumed tiles: persistence of mid-level state across
/// restarts stays a non-goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProgressSnapshot {
    /// Number of tile columns in the grid.
    pub columns: u32,
    /// Number of tile rows in the grid.
    pub rows: u32,
    /// Level the player resumes on.
    pub level: u32,
    /// Number of buff event tiles placed per level.
    pub event_tile_count: usize,
    /// Seed driving deterministic event-tile placement.
    pub rng_seed: u64,
}

impl ProgressSnapshot {
    pub(crate) fn from_config(config: ExpeditionConfig, level: u32) -> Self {
        Self {
            columns: config.width(),
            rows: config.height(),
            level,
            event_tile_count: config.event_tile_count(),
            rng_seed: config.rng_seed(),
        }
    }

    pub(crate) fn into_config(self) -> ExpeditionConfig {
        ExpeditionConfig::new(
            self.columns,
            self.rows,
            self.event_tile_count,
            self.level,
            self.rng_seed,
        )
    }

    /// Encodes the snapshot into a single-line resume code.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializablePayload {
            level: self.level,
            event_tile_count: self.event_tile_count,
            rng_seed: self.rng_seed,
        };
        let json = serde_json::to_vec(&payload).expect("progress serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{CODE_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a snapshot from the provided resume code.
    pub(crate) fn decode(value: &str) -> Result<Self, ProgressTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProgressTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ProgressTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ProgressTransferError::MissingVersion)?;
        let dimensions = parts
            .next()
            .ok_or(ProgressTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(ProgressTransferError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(ProgressTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(ProgressTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ProgressTransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(ProgressTransferError::InvalidPayload)?;

        Ok(Self {
            columns,
            rows,
            level: decoded.level,
            event_tile_count: decoded.event_tile_count,
            rng_seed: decoded.rng_seed,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializablePayload {
    level: u32,
    event_tile_count: usize,
    rng_seed: u64,
}

/// Errors that can occur while decoding resume codes.
#[derive(Debug)]
pub(crate) enum ProgressTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the resume code.
    MissingPrefix,
    /// The resume code did not contain a version segment.
    MissingVersion,
    /// The resume code did not include grid dimensions.
    MissingDimensions,
    /// The resume code did not include the payload segment.
    MissingPayload,
    /// The resume code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The resume code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the resume code.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ProgressTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "resume code was empty"),
            Self::MissingPrefix => write!(f, "resume code is missing the prefix"),
            Self::MissingVersion => write!(f, "resume code is missing the version"),
            Self::MissingDimensions => write!(f, "resume code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "resume code is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "resume code prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "resume code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode resume payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse resume payload: {error}")
            }
        }
    }
}

impl Error for ProgressTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), ProgressTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| ProgressTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| ProgressTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| ProgressTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(ProgressTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_default_progress() {
        let snapshot = ProgressSnapshot {
            columns: 12,
            rows: 12,
            level: 1,
            event_tile_count: 15,
            rng_seed: 0xC0FFEE,
        };

        let encoded = snapshot.encode();
        assert!(encoded.starts_with(&format!("{CODE_HEADER}:12x12:")));

        let decoded = ProgressSnapshot::decode(&encoded).expect("resume code decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_through_config() {
        let config = ExpeditionConfig::new(8, 9, 4, 6, 77);
        let snapshot = ProgressSnapshot::from_config(config, 6);

        let decoded =
            ProgressSnapshot::decode(&snapshot.encode()).expect("resume code decodes");
        assert_eq!(decoded.into_config(), config);
    }

    #[test]
    fn rejects_foreign_prefixes_and_versions() {
        let encoded = ProgressSnapshot {
            columns: 12,
            rows: 12,
            level: 3,
            event_tile_count: 15,
            rng_seed: 1,
        }
        .encode();

        let foreign = encoded.replacen("expedition", "dungeon", 1);
        assert!(matches!(
            ProgressSnapshot::decode(&foreign),
            Err(ProgressTransferError::InvalidPrefix(_))
        ));

        let future = encoded.replacen("v1", "v9", 1);
        assert!(matches!(
            ProgressSnapshot::decode(&future),
            Err(ProgressTransferError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn rejects_empty_and_malformed_codes() {
        assert!(matches!(
            ProgressSnapshot::decode("   "),
            Err(ProgressTransferError::EmptyPayload)
        ));
        assert!(matches!(
            ProgressSnapshot::decode("expedition:v1:12y12:abc"),
            Err(ProgressTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            ProgressSnapshot::decode("expedition:v1:12x12:!!!"),
            Err(ProgressTransferError::InvalidEncoding(_))
        ));
    }
}
