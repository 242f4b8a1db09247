use crate::roster::AllianceRosterIndex;
use crate::{AllianceNumber, CompLevel, MatchRecord, Side, TeamKey, UNPLAYED_SCORE};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one bracket series: a playoff level plus set number.
///
/// All final-level matches share the single implicit key `(Final, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub level: CompLevel,
    pub set_number: u32,
}

impl SeriesKey {
    pub const FINALS: SeriesKey = SeriesKey { level: CompLevel::Final, set_number: 1 };

    pub const fn new(level: CompLevel, set_number: u32) -> Self {
        Self { level, set_number }
    }

    /// Key a match belongs to, or `None` for qualification matches.
    pub fn for_match(record: &MatchRecord) -> Option<Self> {
        match record.comp_level {
            CompLevel::Qual => None,
            CompLevel::Final => Some(Self::FINALS),
            level => Some(Self::new(level, record.set_number)),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level.code(), self.set_number)
    }
}

/// Partition playoff matches into series, each sorted by match number.
pub fn group_series(matches: &[MatchRecord]) -> BTreeMap<SeriesKey, Vec<MatchRecord>> {
    let mut groups: BTreeMap<SeriesKey, Vec<MatchRecord>> = BTreeMap::new();
    for record in matches {
        if let Some(key) = SeriesKey::for_match(record) {
            groups.entry(key).or_default().push(record.clone());
        }
    }
    for games in groups.values_mut() {
        // The finals group can span set numbers on legacy data; keep play order.
        games.sort_by_key(|m| (m.set_number, m.match_number));
    }
    groups
}

/// One side's score in one game of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    /// Raw score; `UNPLAYED_SCORE` passes through untouched.
    pub score: i32,
    pub won: bool,
}

impl GameOutcome {
    pub fn is_played(&self) -> bool {
        self.score != UNPLAYED_SCORE
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_played() {
            write!(f, "{}", self.score)
        } else {
            f.write_str("-")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideResult {
    pub alliance: Option<AllianceNumber>,
    /// Whole alliance when resolved, otherwise the played roster.
    pub full_roster: Vec<TeamKey>,
    /// Teams listed on this side of the first match.
    pub played_roster: Vec<TeamKey>,
    pub games: Vec<GameOutcome>,
    pub won_series: bool,
}

impl SideResult {
    /// Teams in the full roster that did not play the opening match.
    pub fn sat_out(&self) -> impl Iterator<Item = &TeamKey> {
        self.full_roster.iter().filter(|t| !self.played_roster.contains(t))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesResult {
    pub red: SideResult,
    pub blue: SideResult,
}

impl SeriesResult {
    pub fn side(&self, side: Side) -> &SideResult {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        if self.red.won_series {
            Some(Side::Red)
        } else if self.blue.won_series {
            Some(Side::Blue)
        } else {
            None
        }
    }

    pub fn is_decided(&self) -> bool {
        self.winner().is_some()
    }

    /// Side whose resolved alliance is `number`, checking red first.
    pub fn side_of(&self, number: AllianceNumber) -> Option<Side> {
        [Side::Red, Side::Blue]
            .into_iter()
            .find(|&s| self.side(s).alliance == Some(number))
    }

    pub fn game_count(&self) -> usize {
        self.red.games.len()
    }
}

/// Resolve one series' sorted matches into per-side results.
///
/// The first match fixes each side's roster and colour. Only the last
/// match's `winning_side` decides the series; game wins are not counted.
pub fn resolve_series(matches: &[MatchRecord], index: &AllianceRosterIndex) -> Option<SeriesResult> {
    let first = matches.first()?;
    let last = matches.last()?;
    let series_winner = last.winning_side;

    let side_result = |side: Side| {
        let played_roster = first.team_keys(side).to_vec();
        let alliance = index.resolve(&played_roster);
        let full_roster = alliance
            .and_then(|n| index.get(n))
            .map(|a| a.team_keys.clone())
            .unwrap_or_else(|| played_roster.clone());
        let games = matches
            .iter()
            .map(|m| GameOutcome { score: m.score(side), won: m.winning_side == Some(side) })
            .collect();
        SideResult {
            alliance,
            full_roster,
            played_roster,
            games,
            won_series: series_winner == Some(side),
        }
    };

    Some(SeriesResult { red: side_result(Side::Red), blue: side_result(Side::Blue) })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Alliance;

    pub(crate) fn keys(teams: &[&str]) -> Vec<TeamKey> {
        teams.iter().map(|t| TeamKey::from(*t)).collect()
    }

    pub(crate) fn playoff_match(
        level: CompLevel,
        set_number: u32,
        match_number: u32,
        red: &[&str],
        blue: &[&str],
        scores: (i32, i32),
        winner: Option<Side>,
    ) -> MatchRecord {
        MatchRecord {
            key: format!("2024test_{}{}m{}", level.code(), set_number, match_number),
            comp_level: level,
            set_number,
            match_number,
            red_team_keys: keys(red),
            blue_team_keys: keys(blue),
            red_score: scores.0,
            blue_score: scores.1,
            winning_side: winner,
            scheduled_time: None,
        }
    }

    pub(crate) fn three_alliances() -> AllianceRosterIndex {
        AllianceRosterIndex::new(vec![
            Alliance::new(AllianceNumber::new(1).unwrap(), keys(&["T1", "T2", "T3"])),
            Alliance::new(AllianceNumber::new(2).unwrap(), keys(&["T4", "T5", "T6"])),
            Alliance::new(AllianceNumber::new(3).unwrap(), keys(&["T7", "T8", "T9"])),
        ])
    }

    const RED: &[&str] = &["T1", "T2", "T3"];
    const BLUE: &[&str] = &["T4", "T5", "T6"];

    #[test]
    fn grouping_drops_quals_and_sorts_by_match_number() {
        let matches = vec![
            playoff_match(CompLevel::Qual, 1, 12, RED, BLUE, (10, 5), Some(Side::Red)),
            playoff_match(CompLevel::Quarter, 2, 3, RED, BLUE, (-1, -1), None),
            playoff_match(CompLevel::Quarter, 2, 1, RED, BLUE, (50, 40), Some(Side::Red)),
            playoff_match(CompLevel::Quarter, 1, 1, RED, BLUE, (50, 40), Some(Side::Red)),
            playoff_match(CompLevel::Quarter, 2, 2, RED, BLUE, (30, 60), Some(Side::Blue)),
        ];
        let groups = group_series(&matches);
        assert_eq!(groups.len(), 2);
        let qf2 = &groups[&SeriesKey::new(CompLevel::Quarter, 2)];
        let order: Vec<u32> = qf2.iter().map(|m| m.match_number).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(groups.keys().all(|k| k.level != CompLevel::Qual));
    }

    #[test]
    fn final_matches_collapse_into_one_series() {
        let matches = vec![
            playoff_match(CompLevel::Final, 1, 2, RED, BLUE, (80, 90), Some(Side::Blue)),
            playoff_match(CompLevel::Final, 1, 1, RED, BLUE, (100, 90), Some(Side::Red)),
            playoff_match(CompLevel::Final, 2, 1, RED, BLUE, (70, 75), Some(Side::Blue)),
        ];
        let groups = group_series(&matches);
        assert_eq!(groups.len(), 1);
        let finals = &groups[&SeriesKey::FINALS];
        let order: Vec<(u32, u32)> = finals.iter().map(|m| (m.set_number, m.match_number)).collect();
        assert_eq!(order, vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn empty_series_resolves_to_none() {
        assert_eq!(resolve_series(&[], &three_alliances()), None);
    }

    #[test]
    fn last_match_decides_series() {
        let matches = vec![
            playoff_match(CompLevel::Semi, 1, 1, RED, BLUE, (100, 50), Some(Side::Red)),
            playoff_match(CompLevel::Semi, 1, 2, RED, BLUE, (100, 50), Some(Side::Red)),
            playoff_match(CompLevel::Semi, 1, 3, RED, BLUE, (50, 100), Some(Side::Blue)),
        ];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert!(!result.red.won_series);
        assert!(result.blue.won_series);
        assert_eq!(result.winner(), Some(Side::Blue));
    }

    #[test]
    fn single_game_set_uses_its_only_match() {
        let matches = vec![playoff_match(CompLevel::Semi, 4, 1, RED, BLUE, (60, 61), Some(Side::Blue))];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert_eq!(result.winner(), Some(Side::Blue));
        assert_eq!(result.game_count(), 1);
    }

    #[test]
    fn unplayed_sentinel_passes_through() {
        let matches = vec![
            playoff_match(CompLevel::Final, 1, 1, RED, BLUE, (120, 80), Some(Side::Red)),
            playoff_match(CompLevel::Final, 1, 2, RED, BLUE, (-1, -1), None),
        ];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert_eq!(
            result.red.games,
            vec![GameOutcome { score: 120, won: true }, GameOutcome { score: -1, won: false }]
        );
        let rendered: Vec<String> = result.red.games.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["120", "-"]);
        // Last match unplayed: nobody has won yet.
        assert_eq!(result.winner(), None);
        assert!(!result.red.won_series && !result.blue.won_series);
    }

    #[test]
    fn zero_score_renders_as_zero_not_dash() {
        let outcome = GameOutcome { score: 0, won: false };
        assert_eq!(outcome.to_string(), "0");
    }

    #[test]
    fn unresolved_roster_keeps_played_roster() {
        let matches = vec![playoff_match(
            CompLevel::Semi,
            2,
            1,
            &["T1", "T99", "T3"],
            BLUE,
            (10, 20),
            Some(Side::Blue),
        )];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert_eq!(result.red.alliance, None);
        assert_eq!(result.red.full_roster, result.red.played_roster);
        assert_eq!(result.blue.alliance, AllianceNumber::new(2));
    }

    #[test]
    fn resolved_roster_substitutes_full_alliance() {
        let index = AllianceRosterIndex::new(vec![Alliance::new(
            AllianceNumber::new(1).unwrap(),
            keys(&["T1", "T2", "T3", "T10"]),
        )]);
        let matches = vec![playoff_match(CompLevel::Semi, 1, 1, RED, BLUE, (10, 5), Some(Side::Red))];
        let result = resolve_series(&matches, &index).unwrap();
        assert_eq!(result.red.full_roster, keys(&["T1", "T2", "T3", "T10"]));
        assert_eq!(result.red.played_roster, keys(RED));
        assert_eq!(result.red.sat_out().collect::<Vec<_>>(), vec![&TeamKey::from("T10")]);
    }

    #[test]
    fn first_match_roster_is_authoritative() {
        let matches = vec![
            playoff_match(CompLevel::Semi, 1, 1, RED, BLUE, (10, 5), Some(Side::Red)),
            playoff_match(CompLevel::Semi, 1, 2, BLUE, RED, (10, 5), Some(Side::Red)),
        ];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert_eq!(result.red.played_roster, keys(RED));
        assert_eq!(result.red.alliance, AllianceNumber::new(1));
    }

    #[test]
    fn side_of_finds_alliance() {
        let matches = vec![playoff_match(CompLevel::Semi, 1, 1, RED, BLUE, (10, 5), Some(Side::Red))];
        let result = resolve_series(&matches, &three_alliances()).unwrap();
        assert_eq!(result.side_of(AllianceNumber::new(2).unwrap()), Some(Side::Blue));
        assert_eq!(result.side_of(AllianceNumber::new(3).unwrap()), None);
    }

    #[test]
    fn resolution_is_repeatable() {
        let matches = vec![
            playoff_match(CompLevel::Semi, 1, 1, RED, BLUE, (100, 50), Some(Side::Red)),
            playoff_match(CompLevel::Semi, 1, 2, RED, BLUE, (90, 60), Some(Side::Red)),
        ];
        let index = three_alliances();
        assert_eq!(resolve_series(&matches, &index), resolve_series(&matches, &index));
    }
}
