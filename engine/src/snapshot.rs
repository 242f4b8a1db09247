use crate::topology::Topology;
use crate::wire::{EventSnapshot, WireAlliance, WireMatch};
use crate::{Alliance, AllianceNumber, CompLevel, MatchRecord, Side, TeamKey};
use chrono::DateTime;
use log::{debug, warn};
use std::path::Path;
use thiserror::Error;

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Offline demo event bundled into the binary.
pub const DEMO_SNAPSHOT_JSON: &str = include_str!("../demo_event.json");

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid event snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported playoff type {0}")]
    UnsupportedPlayoffType(u8),
    #[error("match {key}: unknown competition level {level:?}")]
    UnknownCompLevel { key: String, level: String },
    #[error("event has {0} alliances, alliance numbers stop at 255")]
    TooManyAlliances(usize),
}

/// One event's playoff data, mapped into domain types.
#[derive(Debug, Clone)]
pub struct Event {
    pub key: String,
    pub name: String,
    pub year: Option<u16>,
    pub topology: Topology,
    /// Alliance N sits at index N-1.
    pub alliances: Vec<Alliance>,
    pub matches: Vec<MatchRecord>,
}

pub fn load_file(path: impl AsRef<Path>) -> SnapshotResult<Event> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|source| SnapshotError::Io { path: path.display().to_string(), source })?;
    parse(&content)
}

pub fn load_demo() -> SnapshotResult<Event> {
    parse(DEMO_SNAPSHOT_JSON)
}

pub fn parse(json: &str) -> SnapshotResult<Event> {
    let raw: EventSnapshot = serde_json::from_str(json)?;
    map_event(raw)
}

/// Display form of a team key: "frc254" → "254". Keys without the
/// program prefix are returned unchanged.
pub fn team_label(key: &TeamKey) -> &str {
    let raw = key.as_str();
    raw.strip_prefix("frc").filter(|rest| !rest.is_empty()).unwrap_or(raw)
}

fn map_event(raw: EventSnapshot) -> SnapshotResult<Event> {
    let topology = match raw.playoff_type {
        Some(code) => Topology::from_playoff_type(code).ok_or(SnapshotError::UnsupportedPlayoffType(code))?,
        None => {
            warn!("event {} has no playoff type, assuming double elimination", raw.key);
            Topology::DoubleElim8
        }
    };

    let alliances = raw
        .alliances
        .iter()
        .enumerate()
        .map(|(i, a)| {
            u8::try_from(i + 1)
                .ok()
                .and_then(AllianceNumber::new)
                .map(|number| map_alliance(a, number))
                .ok_or(SnapshotError::TooManyAlliances(raw.alliances.len()))
        })
        .collect::<SnapshotResult<Vec<_>>>()?;

    let matches = raw
        .matches
        .iter()
        .map(map_match)
        .collect::<SnapshotResult<Vec<_>>>()?;

    let year = raw.year.or_else(|| infer_year_from_key(&raw.key));
    debug!(
        "mapped event {}: {} alliances, {} matches, {:?}",
        raw.key,
        alliances.len(),
        matches.len(),
        topology
    );

    Ok(Event { key: raw.key, name: raw.name, year, topology, alliances, matches })
}

fn map_alliance(raw: &WireAlliance, number: AllianceNumber) -> Alliance {
    let mut team_keys: Vec<TeamKey> = raw.picks.iter().map(|k| TeamKey::new(k.as_str())).collect();
    if let Some(backup_in) = raw.backup.as_ref().and_then(|b| b.team_in.as_deref()) {
        let backup = TeamKey::new(backup_in);
        if !team_keys.contains(&backup) {
            team_keys.push(backup);
        }
    }

    let status = raw.status.as_ref();
    let level = status.and_then(|s| s.level.as_deref());
    let is_winner = status.and_then(|s| s.status.as_deref()) == Some("won") && level == Some("f");
    Alliance {
        number,
        team_keys,
        name: raw.name.clone(),
        is_finalist: level == Some("f"),
        is_winner,
    }
}

fn map_match(raw: &WireMatch) -> SnapshotResult<MatchRecord> {
    let comp_level = CompLevel::from_code(&raw.comp_level).ok_or_else(|| SnapshotError::UnknownCompLevel {
        key: raw.key.clone(),
        level: raw.comp_level.clone(),
    })?;
    let to_keys = |keys: &[String]| -> Vec<TeamKey> { keys.iter().map(|k| TeamKey::new(k.as_str())).collect() };

    Ok(MatchRecord {
        key: raw.key.clone(),
        comp_level,
        set_number: raw.set_number,
        match_number: raw.match_number,
        red_team_keys: to_keys(&raw.alliances.red.team_keys),
        blue_team_keys: to_keys(&raw.alliances.blue.team_keys),
        red_score: raw.alliances.red.score,
        blue_score: raw.alliances.blue.score,
        winning_side: parse_winning_side(raw.winning_alliance.as_deref()),
        scheduled_time: raw.time.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}

fn parse_winning_side(s: Option<&str>) -> Option<Side> {
    match s {
        Some("red") => Some(Side::Red),
        Some("blue") => Some(Side::Blue),
        _ => None,
    }
}

/// Event keys start with the season year ("2024casj").
fn infer_year_from_key(key: &str) -> Option<u16> {
    key.get(..4)?.parse::<u16>().ok().filter(|y| *y >= 1992)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNPLAYED_SCORE;

    const MINIMAL: &str = r#"{
        "key": "2024demo",
        "name": "Demo Regional",
        "playoff_type": 10,
        "alliances": [
            {"name": "Alliance 1", "picks": ["frc1", "frc2", "frc3"],
             "backup": {"in": "frc10", "out": "frc2"},
             "status": {"level": "f", "status": "won"}},
            {"picks": ["frc4", "frc5", "frc6"], "status": {"level": "f", "status": "eliminated"}},
            {"picks": ["frc7", "frc8", "frc9"], "status": {"level": "sf", "status": "eliminated"}}
        ],
        "matches": [
            {"key": "2024demo_sf1m1", "comp_level": "sf", "set_number": 1, "match_number": 1,
             "alliances": {"red": {"team_keys": ["frc1", "frc2", "frc3"], "score": 100},
                           "blue": {"team_keys": ["frc4", "frc5", "frc6"], "score": 50}},
             "winning_alliance": "red", "time": 1711800000},
            {"key": "2024demo_f1m1", "comp_level": "f", "set_number": 1, "match_number": 1,
             "alliances": {"red": {"team_keys": ["frc1", "frc10", "frc3"]},
                           "blue": {"team_keys": ["frc4", "frc5", "frc6"], "score": -1}},
             "winning_alliance": ""}
        ]
    }"#;

    #[test]
    fn minimal_snapshot_maps_to_domain_types() {
        let event = parse(MINIMAL).expect("snapshot should parse");
        assert_eq!(event.key, "2024demo");
        assert_eq!(event.year, Some(2024));
        assert_eq!(event.topology, Topology::DoubleElim8);
        assert_eq!(event.alliances.len(), 3);
        assert_eq!(event.matches.len(), 2);
    }

    #[test]
    fn alliance_numbers_follow_list_order() {
        let event = parse(MINIMAL).unwrap();
        let numbers: Vec<u8> = event.alliances.iter().map(|a| a.number.get()).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn backup_team_joins_full_roster() {
        let event = parse(MINIMAL).unwrap();
        let first = &event.alliances[0];
        assert_eq!(first.team_keys.last().map(TeamKey::as_str), Some("frc10"));
        assert_eq!(first.team_keys.len(), 4);
    }

    #[test]
    fn alliance_status_sets_finalist_and_winner() {
        let event = parse(MINIMAL).unwrap();
        assert!(event.alliances[0].is_finalist && event.alliances[0].is_winner);
        assert!(event.alliances[1].is_finalist && !event.alliances[1].is_winner);
        assert!(!event.alliances[2].is_finalist);
    }

    #[test]
    fn missing_score_and_blank_winner_mean_unplayed() {
        let event = parse(MINIMAL).unwrap();
        let final_match = &event.matches[1];
        assert_eq!(final_match.comp_level, CompLevel::Final);
        assert_eq!(final_match.red_score, UNPLAYED_SCORE);
        assert_eq!(final_match.blue_score, UNPLAYED_SCORE);
        assert_eq!(final_match.winning_side, None);
        assert!(final_match.scheduled_time.is_none());
        assert!(event.matches[0].scheduled_time.is_some());
    }

    #[test]
    fn unknown_playoff_type_is_rejected() {
        let json = r#"{"key": "2024x", "playoff_type": 4}"#;
        assert!(matches!(parse(json), Err(SnapshotError::UnsupportedPlayoffType(4))));
    }

    #[test]
    fn missing_playoff_type_defaults_to_double_elimination() {
        let event = parse(r#"{"key": "2024x"}"#).unwrap();
        assert_eq!(event.topology, Topology::DoubleElim8);
    }

    #[test]
    fn unknown_comp_level_is_rejected() {
        let json = r#"{"key": "2024x", "playoff_type": 10, "matches": [
            {"key": "2024x_zz1m1", "comp_level": "zz", "set_number": 1, "match_number": 1}
        ]}"#;
        match parse(json) {
            Err(SnapshotError::UnknownCompLevel { key, level }) => {
                assert_eq!(key, "2024x_zz1m1");
                assert_eq!(level, "zz");
            }
            other => panic!("expected UnknownCompLevel, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(parse("{not json"), Err(SnapshotError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn team_label_strips_program_prefix() {
        assert_eq!(team_label(&TeamKey::from("frc254")), "254");
        assert_eq!(team_label(&TeamKey::from("T1")), "T1");
        assert_eq!(team_label(&TeamKey::from("frc")), "frc");
    }

    #[test]
    fn year_inferred_from_event_key() {
        assert_eq!(infer_year_from_key("2023txhou"), Some(2023));
        assert_eq!(infer_year_from_key("demo"), None);
        assert_eq!(infer_year_from_key("0042abc"), None);
    }

    #[test]
    fn embedded_demo_snapshot_parses() {
        let event = load_demo().expect("demo snapshot should parse");
        assert_eq!(event.topology, Topology::DoubleElim8);
        assert_eq!(event.alliances.len(), 8);
        assert!(!event.matches.is_empty());
    }
}
