/// Raw wire types for an event snapshot, shaped after The Blue Alliance's
/// event/alliances/matches payloads. Mapped to domain types in snapshot.rs.
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EventSnapshot {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year: Option<u16>,
    /// Numeric playoff format; see `Topology::from_playoff_type`.
    pub playoff_type: Option<u8>,
    #[serde(default)]
    pub alliances: Vec<WireAlliance>,
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireAlliance {
    pub name: Option<String>,
    #[serde(default)]
    pub picks: Vec<String>,
    pub backup: Option<WireBackup>,
    pub status: Option<WireAllianceStatus>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireBackup {
    #[serde(rename = "in")]
    pub team_in: Option<String>,
    pub out: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireAllianceStatus {
    /// Furthest level reached ("sf", "f", ...).
    pub level: Option<String>,
    /// "won", "eliminated" or "playing".
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatch {
    pub key: String,
    pub comp_level: String,
    pub set_number: u32,
    pub match_number: u32,
    #[serde(default)]
    pub alliances: WireMatchAlliances,
    /// "red", "blue" or "" while unplayed / tied.
    #[serde(default)]
    pub winning_alliance: Option<String>,
    /// Unix seconds.
    pub time: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireMatchAlliances {
    #[serde(default)]
    pub red: WireMatchSide,
    #[serde(default)]
    pub blue: WireMatchSide,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireMatchSide {
    #[serde(default)]
    pub team_keys: Vec<String>,
    #[serde(default = "unplayed")]
    pub score: i32,
}

impl Default for WireMatchSide {
    fn default() -> Self {
        Self { team_keys: Vec::new(), score: unplayed() }
    }
}

fn unplayed() -> i32 {
    crate::UNPLAYED_SCORE
}
