//! `MatchTime` struct published by the robot: match period, remaining time and
//! game-specific data.
//!
//! Wire layout (little-endian, 19 bytes):
//!
//! | field | type |
//! |---|---|
//! | period | int8 |
//! | remainingTime | double |
//! | gameSeason | int16 |
//! | gameData | int64 |
//!
//! The game data field is a season-specific bit set; [`GameData2026`] interprets it for the
//! 2026 season, where the field message names the alliance whose goal goes inactive first.

use serde_json::{json, Value};

use super::{ChannelRecord, ChannelValue};

pub const TYPE_NAME: &str = "MatchTime";
pub const STRUCT_TYPE: &str = "struct:MatchTime";
pub const SCHEMA: &str = "int8 period;double remainingTime;int16 gameSeason;int64 gameData;";
pub const SIZE: usize = 1 + 8 + 2 + 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchTimeError {
    #[error("MatchTime payload is {0} bytes, expected {SIZE}")]
    Length(usize),
    #[error("unsupported match period code {0}")]
    Period(i8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPeriod {
    #[default]
    None,
    Auto,
    Teleop,
}

impl MatchPeriod {
    pub fn code(self) -> i8 {
        match self {
            MatchPeriod::None => 0,
            MatchPeriod::Auto => 1,
            MatchPeriod::Teleop => 2,
        }
    }

    pub fn from_code(code: i8) -> Result<Self, MatchTimeError> {
        match code {
            0 => Ok(MatchPeriod::None),
            1 => Ok(MatchPeriod::Auto),
            2 => Ok(MatchPeriod::Teleop),
            other => Err(MatchTimeError::Period(other)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchPeriod::None => "none",
            MatchPeriod::Auto => "auto",
            MatchPeriod::Teleop => "teleop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTime {
    pub period: MatchPeriod,
    /// Seconds left in the current period, negative when unknown.
    pub remaining_time: f64,
    pub game_season: i16,
    pub game_data: i64,
}

impl MatchTime {
    pub fn new(period: MatchPeriod, remaining_time: f64, game_season: i16, game_data: i64) -> Self {
        Self {
            period,
            remaining_time,
            game_season,
            game_data,
        }
    }

    /// Value published before the driver station reports a match.
    pub fn idle(game_season: i16) -> Self {
        Self::new(MatchPeriod::None, -1.0, game_season, 0)
    }

    pub fn unpack(bytes: &[u8]) -> Result<Self, MatchTimeError> {
        let bytes: &[u8; SIZE] = bytes
            .try_into()
            .map_err(|_| MatchTimeError::Length(bytes.len()))?;

        let period = MatchPeriod::from_code(bytes[0] as i8)?;
        let mut remaining = [0u8; 8];
        remaining.copy_from_slice(&bytes[1..9]);
        let mut season = [0u8; 2];
        season.copy_from_slice(&bytes[9..11]);
        let mut data = [0u8; 8];
        data.copy_from_slice(&bytes[11..19]);

        Ok(Self {
            period,
            remaining_time: f64::from_le_bytes(remaining),
            game_season: i16::from_le_bytes(season),
            game_data: i64::from_le_bytes(data),
        })
    }

    pub fn pack(&self) -> [u8; SIZE] {
        let mut out = [0u8; SIZE];
        out[0] = self.period.code() as u8;
        out[1..9].copy_from_slice(&self.remaining_time.to_le_bytes());
        out[9..11].copy_from_slice(&self.game_season.to_le_bytes());
        out[11..19].copy_from_slice(&self.game_data.to_le_bytes());
        out
    }

    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "period": self.period.label(),
            "remainingTime": self.remaining_time,
            "gameSeason": self.game_season,
        });
        if self.game_season == 2026 {
            let data = GameData2026::decode(self.game_data);
            value["alliance"] = json!(data.alliance.label());
            value["inactiveFirst"] = json!(data.inactive_first);
        }
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alliance {
    Blue,
    Red,
}

impl Alliance {
    pub fn label(self) -> &'static str {
        match self {
            Alliance::Blue => "blue",
            Alliance::Red => "red",
        }
    }
}

/// Game data for the 2026 season.
///
/// Bit 0 is set when the robot's alliance goes inactive first, bit 1 is the alliance
/// (0 blue, 1 red).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameData2026 {
    pub alliance: Alliance,
    pub inactive_first: bool,
}

impl GameData2026 {
    /// Encodes the field message (`'B'` or `'R'`) for a robot on `alliance`. Unknown
    /// alliances count as blue and unknown messages leave bit 0 clear.
    pub fn from_message(alliance: Option<Alliance>, message: &str) -> i64 {
        let red = alliance == Some(Alliance::Red);
        let inactive_first = match message.chars().next() {
            Some('B') => !red,
            Some('R') => red,
            _ => false,
        };
        ((red as i64) << 1) | inactive_first as i64
    }

    pub fn decode(bits: i64) -> Self {
        Self {
            alliance: if bits & 0b10 != 0 {
                Alliance::Red
            } else {
                Alliance::Blue
            },
            inactive_first: bits & 0b01 != 0,
        }
    }

    pub fn encode(self) -> i64 {
        (((self.alliance == Alliance::Red) as i64) << 1) | self.inactive_first as i64
    }
}

/// Transform used by the match-time widget.
pub fn transform(record: &ChannelRecord) -> Option<Value> {
    match &record.value {
        ChannelValue::Struct { type_name, bytes } if type_name == STRUCT_TYPE => {
            match MatchTime::unpack(bytes) {
                Ok(match_time) => Some(match_time.to_json()),
                Err(e) => {
                    tracing::debug!(path = %record.path, error = %e, "dropping malformed MatchTime");
                    None
                }
            }
        }
        ChannelValue::Double(remaining) => Some(json!({ "remainingTime": remaining })),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/match_time.rs"]
mod tests;
