pub mod bracket;
pub mod projector;
pub mod roster;
pub mod series;
pub mod snapshot;
pub mod topology;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use bracket::Bracket;
pub use projector::{BoundingBox, CardGeometry, ConnectorPath, CubicCurve, PathProjector, Point};
pub use roster::AllianceRosterIndex;
pub use series::{GameOutcome, SeriesKey, SeriesResult, SideResult, group_series, resolve_series};
pub use topology::{AdvancementEdge, Topology};

// ---------------------------------------------------------------------------
// Domain types, independent of the snapshot wire format
// ---------------------------------------------------------------------------

/// Raw score value meaning "this match has not been played yet".
pub const UNPLAYED_SCORE: i32 = -1;

/// Opaque team identifier. The engine only compares these for equality;
/// turning "frc254" into "254" is the ingestion layer's job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamKey(String);

impl TeamKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// 1-based alliance number, stable for the duration of a playoff stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllianceNumber(u8);

impl AllianceNumber {
    /// Returns `None` for 0; alliance numbers start at 1.
    pub fn new(number: u8) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for AllianceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alliance {
    pub number: AllianceNumber,
    /// Captain first, then picks in selection order, then any backup.
    pub team_keys: Vec<TeamKey>,
    pub name: Option<String>,
    pub is_finalist: bool,
    pub is_winner: bool,
}

impl Alliance {
    pub fn new(number: AllianceNumber, team_keys: Vec<TeamKey>) -> Self {
        Self { number, team_keys, name: None, is_finalist: false, is_winner: false }
    }

    /// Event-supplied name, or "Alliance N".
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Alliance {}", self.number),
        }
    }

    pub fn contains(&self, team: &TeamKey) -> bool {
        self.team_keys.contains(team)
    }
}

/// Tournament stage tag. Ordered from earliest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CompLevel {
    Qual,
    Eighth,
    Quarter,
    Semi,
    Final,
}

impl CompLevel {
    /// Parse the short wire code ("qm", "ef", "qf", "sf", "f").
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "qm" => Some(CompLevel::Qual),
            "ef" => Some(CompLevel::Eighth),
            "qf" => Some(CompLevel::Quarter),
            "sf" => Some(CompLevel::Semi),
            "f" => Some(CompLevel::Final),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompLevel::Qual => "qm",
            CompLevel::Eighth => "ef",
            CompLevel::Quarter => "qf",
            CompLevel::Semi => "sf",
            CompLevel::Final => "f",
        }
    }

    pub fn is_playoff(&self) -> bool {
        !matches!(self, CompLevel::Qual)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Red,
    Blue,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Blue => "blue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub key: String,
    pub comp_level: CompLevel,
    pub set_number: u32,
    pub match_number: u32,
    pub red_team_keys: Vec<TeamKey>,
    pub blue_team_keys: Vec<TeamKey>,
    /// `UNPLAYED_SCORE` until the match is played.
    pub red_score: i32,
    pub blue_score: i32,
    /// `None` for unplayed matches and ties.
    pub winning_side: Option<Side>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl MatchRecord {
    pub fn team_keys(&self, side: Side) -> &[TeamKey] {
        match side {
            Side::Red => &self.red_team_keys,
            Side::Blue => &self.blue_team_keys,
        }
    }

    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Red => self.red_score,
            Side::Blue => self.blue_score,
        }
    }

    pub fn is_played(&self) -> bool {
        self.red_score != UNPLAYED_SCORE && self.blue_score != UNPLAYED_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_number_rejects_zero() {
        assert!(AllianceNumber::new(0).is_none());
        assert_eq!(AllianceNumber::new(3).map(AllianceNumber::get), Some(3));
    }

    #[test]
    fn alliance_display_name_falls_back_to_number() {
        let number = AllianceNumber::new(4).unwrap();
        let mut alliance = Alliance::new(number, vec![]);
        assert_eq!(alliance.display_name(), "Alliance 4");

        alliance.name = Some("  ".into());
        assert_eq!(alliance.display_name(), "Alliance 4");

        alliance.name = Some("Einstein".into());
        assert_eq!(alliance.display_name(), "Einstein");
    }

    #[test]
    fn comp_level_codes_round_trip() {
        for level in [CompLevel::Qual, CompLevel::Eighth, CompLevel::Quarter, CompLevel::Semi, CompLevel::Final] {
            assert_eq!(CompLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(CompLevel::from_code("xx"), None);
        assert!(!CompLevel::Qual.is_playoff());
        assert!(CompLevel::Final.is_playoff());
    }

    #[test]
    fn side_opponent_flips() {
        assert_eq!(Side::Red.opponent(), Side::Blue);
        assert_eq!(Side::Blue.opponent(), Side::Red);
    }
}
