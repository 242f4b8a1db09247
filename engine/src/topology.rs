use crate::CompLevel;
use crate::series::SeriesKey;

/// "The winner of `from` plays next in `to`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvancementEdge {
    pub from: SeriesKey,
    pub to: SeriesKey,
}

const fn edge(from: SeriesKey, to: SeriesKey) -> AdvancementEdge {
    AdvancementEdge { from, to }
}

const fn sf(set: u32) -> SeriesKey {
    SeriesKey::new(CompLevel::Semi, set)
}

const fn qf(set: u32) -> SeriesKey {
    SeriesKey::new(CompLevel::Quarter, set)
}

const fn ef(set: u32) -> SeriesKey {
    SeriesKey::new(CompLevel::Eighth, set)
}

const FINALS: SeriesKey = SeriesKey::FINALS;

/// Supported playoff formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Eight alliances, double elimination. Matches 1-13 are "sf" sets.
    #[default]
    DoubleElim8,
    /// Four alliances, double elimination. Matches 1-5 are "sf" sets.
    DoubleElim4,
    /// Four alliances, single elimination (SF1, SF2, Finals).
    Bracket4,
    /// Eight alliances, single elimination (QF1-4, SF1-2, Finals).
    Bracket8,
    /// Sixteen alliances, single elimination (EF1-8 onward).
    Bracket16,
}

// Winner routing only; losers dropping into the lower bracket are not drawn.
const DOUBLE_ELIM_8_EDGES: [AdvancementEdge; 13] = [
    edge(sf(1), sf(7)),
    edge(sf(2), sf(7)),
    edge(sf(3), sf(8)),
    edge(sf(4), sf(8)),
    edge(sf(5), sf(10)),
    edge(sf(6), sf(9)),
    edge(sf(7), sf(11)),
    edge(sf(8), sf(11)),
    edge(sf(9), sf(12)),
    edge(sf(10), sf(12)),
    edge(sf(11), FINALS),
    edge(sf(12), sf(13)),
    edge(sf(13), FINALS),
];

const DOUBLE_ELIM_4_EDGES: [AdvancementEdge; 5] = [
    edge(sf(1), sf(4)),
    edge(sf(2), sf(4)),
    edge(sf(3), sf(5)),
    edge(sf(4), FINALS),
    edge(sf(5), FINALS),
];

const BRACKET_4_EDGES: [AdvancementEdge; 2] = [edge(sf(1), FINALS), edge(sf(2), FINALS)];

const BRACKET_8_EDGES: [AdvancementEdge; 6] = [
    edge(qf(1), sf(1)),
    edge(qf(2), sf(1)),
    edge(qf(3), sf(2)),
    edge(qf(4), sf(2)),
    edge(sf(1), FINALS),
    edge(sf(2), FINALS),
];

const BRACKET_16_EDGES: [AdvancementEdge; 14] = [
    edge(ef(1), qf(1)),
    edge(ef(2), qf(1)),
    edge(ef(3), qf(2)),
    edge(ef(4), qf(2)),
    edge(ef(5), qf(3)),
    edge(ef(6), qf(3)),
    edge(ef(7), qf(4)),
    edge(ef(8), qf(4)),
    edge(qf(1), sf(1)),
    edge(qf(2), sf(1)),
    edge(qf(3), sf(2)),
    edge(qf(4), sf(2)),
    edge(sf(1), FINALS),
    edge(sf(2), FINALS),
];

const DOUBLE_ELIM_8_SERIES: [SeriesKey; 14] = [
    sf(1), sf(2), sf(3), sf(4), sf(5), sf(6), sf(7),
    sf(8), sf(9), sf(10), sf(11), sf(12), sf(13), FINALS,
];

const DOUBLE_ELIM_4_SERIES: [SeriesKey; 6] = [sf(1), sf(2), sf(3), sf(4), sf(5), FINALS];

const BRACKET_4_SERIES: [SeriesKey; 3] = [sf(1), sf(2), FINALS];

const BRACKET_8_SERIES: [SeriesKey; 7] = [qf(1), qf(2), qf(3), qf(4), sf(1), sf(2), FINALS];

const BRACKET_16_SERIES: [SeriesKey; 15] = [
    ef(1), ef(2), ef(3), ef(4), ef(5), ef(6), ef(7), ef(8),
    qf(1), qf(2), qf(3), qf(4), sf(1), sf(2), FINALS,
];

impl Topology {
    pub const ALL: [Topology; 5] = [
        Topology::DoubleElim8,
        Topology::DoubleElim4,
        Topology::Bracket4,
        Topology::Bracket8,
        Topology::Bracket16,
    ];

    /// Map the event's numeric playoff type.
    pub fn from_playoff_type(playoff_type: u8) -> Option<Self> {
        match playoff_type {
            0 => Some(Topology::Bracket8),
            1 => Some(Topology::Bracket16),
            2 => Some(Topology::Bracket4),
            10 => Some(Topology::DoubleElim8),
            11 => Some(Topology::DoubleElim4),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Topology::DoubleElim8 => "Double Elimination (8 alliances)",
            Topology::DoubleElim4 => "Double Elimination (4 alliances)",
            Topology::Bracket4 => "Bracket (4 alliances)",
            Topology::Bracket8 => "Bracket (8 alliances)",
            Topology::Bracket16 => "Bracket (16 alliances)",
        }
    }

    pub fn alliance_count(&self) -> usize {
        match self {
            Topology::DoubleElim4 | Topology::Bracket4 => 4,
            Topology::DoubleElim8 | Topology::Bracket8 => 8,
            Topology::Bracket16 => 16,
        }
    }

    pub fn is_double_elimination(&self) -> bool {
        matches!(self, Topology::DoubleElim8 | Topology::DoubleElim4)
    }

    pub fn edges(&self) -> &'static [AdvancementEdge] {
        match self {
            Topology::DoubleElim8 => &DOUBLE_ELIM_8_EDGES,
            Topology::DoubleElim4 => &DOUBLE_ELIM_4_EDGES,
            Topology::Bracket4 => &BRACKET_4_EDGES,
            Topology::Bracket8 => &BRACKET_8_EDGES,
            Topology::Bracket16 => &BRACKET_16_EDGES,
        }
    }

    /// Every series of the format, in play order.
    pub fn series(&self) -> &'static [SeriesKey] {
        match self {
            Topology::DoubleElim8 => &DOUBLE_ELIM_8_SERIES,
            Topology::DoubleElim4 => &DOUBLE_ELIM_4_SERIES,
            Topology::Bracket4 => &BRACKET_4_SERIES,
            Topology::Bracket8 => &BRACKET_8_SERIES,
            Topology::Bracket16 => &BRACKET_16_SERIES,
        }
    }

    pub fn contains(&self, key: SeriesKey) -> bool {
        self.series().contains(&key)
    }

    /// Edges leaving `key` (at most one per format).
    pub fn feeds_into(&self, key: SeriesKey) -> Option<SeriesKey> {
        self.edges().iter().find(|e| e.from == key).map(|e| e.to)
    }

    /// Series whose winners arrive in `key`.
    pub fn fed_by(&self, key: SeriesKey) -> Vec<SeriesKey> {
        self.edges().iter().filter(|e| e.to == key).map(|e| e.from).collect()
    }

    /// Card title for a series under this format.
    pub fn series_name(&self, key: SeriesKey) -> String {
        if key.level == CompLevel::Final {
            return "Finals".to_string();
        }
        if self.is_double_elimination() {
            return format!("Match {}", key.set_number);
        }
        match key.level {
            CompLevel::Eighth => format!("Eighthfinal {}", key.set_number),
            CompLevel::Quarter => format!("Quarterfinal {}", key.set_number),
            CompLevel::Semi => format!("Semifinal {}", key.set_number),
            _ => format!("Match {}", key.set_number),
        }
    }

    /// Compact card title used where width is tight.
    pub fn series_short_name(&self, key: SeriesKey) -> String {
        if key.level == CompLevel::Final {
            return "F".to_string();
        }
        if self.is_double_elimination() {
            return format!("M{}", key.set_number);
        }
        format!("{}{}", key.level.code().to_uppercase(), key.set_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn double_elim_8_has_thirteen_edges() {
        assert_eq!(Topology::DoubleElim8.edges().len(), 13);
    }

    #[test]
    fn every_edge_endpoint_is_a_known_series() {
        for topology in Topology::ALL {
            for e in topology.edges() {
                assert!(topology.contains(e.from), "{topology:?}: unknown source {}", e.from);
                assert!(topology.contains(e.to), "{topology:?}: unknown destination {}", e.to);
            }
        }
    }

    #[test]
    fn finals_is_the_single_terminal_node() {
        for topology in Topology::ALL {
            let sources: HashSet<SeriesKey> = topology.edges().iter().map(|e| e.from).collect();
            let terminals: Vec<SeriesKey> = topology
                .series()
                .iter()
                .copied()
                .filter(|s| !sources.contains(s))
                .collect();
            assert_eq!(terminals, vec![SeriesKey::FINALS], "{topology:?}");
        }
    }

    #[test]
    fn edges_form_a_dag() {
        for topology in Topology::ALL {
            // Walking winner edges from any series must reach Finals within |series| steps.
            for &start in topology.series() {
                let mut at = start;
                let mut steps = 0;
                while let Some(next) = topology.feeds_into(at) {
                    at = next;
                    steps += 1;
                    assert!(steps <= topology.series().len(), "{topology:?}: cycle from {start}");
                }
                assert_eq!(at, SeriesKey::FINALS);
            }
        }
    }

    #[test]
    fn each_non_finals_series_sends_its_winner_somewhere() {
        for topology in Topology::ALL {
            assert_eq!(topology.edges().len(), topology.series().len() - 1, "{topology:?}");
        }
    }

    #[test]
    fn playoff_type_mapping() {
        assert_eq!(Topology::from_playoff_type(10), Some(Topology::DoubleElim8));
        assert_eq!(Topology::from_playoff_type(11), Some(Topology::DoubleElim4));
        assert_eq!(Topology::from_playoff_type(0), Some(Topology::Bracket8));
        assert_eq!(Topology::from_playoff_type(1), Some(Topology::Bracket16));
        assert_eq!(Topology::from_playoff_type(2), Some(Topology::Bracket4));
        assert_eq!(Topology::from_playoff_type(4), None);
    }

    #[test]
    fn series_names_follow_format() {
        let de = Topology::DoubleElim8;
        assert_eq!(de.series_name(sf(5)), "Match 5");
        assert_eq!(de.series_name(FINALS), "Finals");
        assert_eq!(de.series_short_name(sf(13)), "M13");
        let b8 = Topology::Bracket8;
        assert_eq!(b8.series_name(qf(2)), "Quarterfinal 2");
        assert_eq!(b8.series_short_name(qf(2)), "QF2");
    }

    #[test]
    fn upper_bracket_feeds() {
        let de = Topology::DoubleElim8;
        assert_eq!(de.fed_by(sf(7)), vec![sf(1), sf(2)]);
        assert_eq!(de.fed_by(FINALS), vec![sf(11), sf(13)]);
        assert_eq!(de.feeds_into(sf(6)), Some(sf(9)));
    }
}
