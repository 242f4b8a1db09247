use crate::{Alliance, AllianceNumber, TeamKey};
use log::trace;

/// Ordered, immutable list of the stage's alliances.
///
/// Built once from selection results. Lookups never mutate it, so the same
/// index can back every resolution for the life of the stage.
#[derive(Debug, Clone, Default)]
pub struct AllianceRosterIndex {
    alliances: Vec<Alliance>,
}

impl AllianceRosterIndex {
    pub fn new(alliances: Vec<Alliance>) -> Self {
        Self { alliances }
    }

    /// First alliance (in defined order) whose roster contains every queried team.
    ///
    /// Superset test: a played roster that is a subset of the alliance (a
    /// backup or pick sitting out) still resolves. An empty query resolves to
    /// nothing, so placeholder rows never pick up an alliance label.
    pub fn resolve(&self, team_keys: &[TeamKey]) -> Option<AllianceNumber> {
        if team_keys.is_empty() {
            return None;
        }
        let found = self
            .alliances
            .iter()
            .find(|alliance| team_keys.iter().all(|team| alliance.contains(team)))
            .map(|alliance| alliance.number);
        if found.is_none() {
            trace!("no alliance owns roster {team_keys:?}");
        }
        found
    }

    pub fn get(&self, number: AllianceNumber) -> Option<&Alliance> {
        self.alliances.iter().find(|a| a.number == number)
    }

    pub fn alliances(&self) -> &[Alliance] {
        &self.alliances
    }

    pub fn len(&self) -> usize {
        self.alliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn alliance(n: u8, teams: &[&str]) -> Alliance {
        Alliance::new(
            AllianceNumber::new(n).unwrap(),
            teams.iter().map(|t| TeamKey::from(*t)).collect(),
        )
    }

    fn keys(teams: &[&str]) -> Vec<TeamKey> {
        teams.iter().map(|t| TeamKey::from(*t)).collect()
    }

    fn sample_index() -> AllianceRosterIndex {
        AllianceRosterIndex::new(vec![
            alliance(1, &["frc1", "frc2", "frc3", "frc10"]),
            alliance(2, &["frc4", "frc5", "frc6"]),
            alliance(3, &["frc7", "frc8", "frc9"]),
        ])
    }

    #[test]
    fn exact_roster_resolves() {
        let index = sample_index();
        assert_eq!(index.resolve(&keys(&["frc4", "frc5", "frc6"])), AllianceNumber::new(2));
    }

    #[test]
    fn partial_roster_resolves_to_owning_alliance() {
        let index = sample_index();
        // Backup frc10 played instead of frc2.
        assert_eq!(index.resolve(&keys(&["frc1", "frc10", "frc3"])), AllianceNumber::new(1));
    }

    #[test]
    fn unknown_team_resolves_to_none() {
        let index = sample_index();
        assert_eq!(index.resolve(&keys(&["frc1", "frc2", "frc9999"])), None);
    }

    #[test]
    fn mixed_alliance_roster_resolves_to_none() {
        let index = sample_index();
        assert_eq!(index.resolve(&keys(&["frc1", "frc4"])), None);
    }

    #[test]
    fn empty_query_resolves_to_none() {
        assert_eq!(sample_index().resolve(&[]), None);
    }

    #[test]
    fn overlapping_rosters_resolve_to_first_alliance() {
        let index = AllianceRosterIndex::new(vec![
            alliance(1, &["frc1", "frc2", "frc3"]),
            alliance(2, &["frc1", "frc2", "frc4"]),
        ]);
        assert_eq!(index.resolve(&keys(&["frc1", "frc2"])), AllianceNumber::new(1));
    }

    #[test]
    fn get_looks_up_by_number() {
        let index = sample_index();
        let third = index.get(AllianceNumber::new(3).unwrap()).unwrap();
        assert_eq!(third.team_keys, keys(&["frc7", "frc8", "frc9"]));
        assert!(index.get(AllianceNumber::new(9).unwrap()).is_none());
    }

    proptest! {
        #[test]
        fn every_nonempty_subset_resolves_to_its_alliance(
            owner in 0usize..3,
            mask in 1u8..16,
        ) {
            let index = sample_index();
            let roster = &index.alliances()[owner].team_keys;
            let subset: Vec<TeamKey> = roster
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, t)| t.clone())
                .collect();
            prop_assume!(!subset.is_empty());
            prop_assert_eq!(index.resolve(&subset), Some(index.alliances()[owner].number));
        }
    }
}
