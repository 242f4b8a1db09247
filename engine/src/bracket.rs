use crate::projector::{BoundingBox, CardGeometry, ConnectorPath, PathProjector};
use crate::roster::AllianceRosterIndex;
use crate::series::{SeriesKey, SeriesResult, group_series, resolve_series};
use crate::snapshot::Event;
use crate::topology::Topology;
use crate::{Alliance, AllianceNumber, MatchRecord};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

/// Resolved view of one playoff stage: grouped series plus their results.
///
/// Rebuilt from scratch whenever new match data arrives; nothing here is
/// updated in place.
#[derive(Debug, Clone, Default)]
pub struct Bracket {
    pub topology: Topology,
    index: AllianceRosterIndex,
    series: BTreeMap<SeriesKey, Vec<MatchRecord>>,
    results: BTreeMap<SeriesKey, SeriesResult>,
}

impl Bracket {
    pub fn new(topology: Topology, alliances: Vec<Alliance>, matches: &[MatchRecord]) -> Self {
        let index = AllianceRosterIndex::new(alliances);
        let series = group_series(matches);
        let results: BTreeMap<SeriesKey, SeriesResult> = series
            .iter()
            .filter_map(|(key, games)| resolve_series(games, &index).map(|r| (*key, r)))
            .collect();

        for key in series.keys().filter(|k| !topology.contains(**k)) {
            warn!("series {key} is not part of {:?}; it will not be drawn", topology);
        }
        debug!(
            "bracket built: {} series, {} decided",
            results.len(),
            results.values().filter(|r| r.is_decided()).count()
        );

        Self { topology, index, series, results }
    }

    pub fn from_event(event: &Event) -> Self {
        Self::new(event.topology, event.alliances.clone(), &event.matches)
    }

    pub fn alliances(&self) -> &[Alliance] {
        self.index.alliances()
    }

    pub fn alliance(&self, number: AllianceNumber) -> Option<&Alliance> {
        self.index.get(number)
    }

    pub fn roster_index(&self) -> &AllianceRosterIndex {
        &self.index
    }

    pub fn result(&self, key: SeriesKey) -> Option<&SeriesResult> {
        self.results.get(&key)
    }

    pub fn results(&self) -> &BTreeMap<SeriesKey, SeriesResult> {
        &self.results
    }

    /// Matches of one series in play order; empty if not yet scheduled.
    pub fn matches(&self, key: SeriesKey) -> &[MatchRecord] {
        self.series.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Winner of the finals series, once decided.
    pub fn champion(&self) -> Option<AllianceNumber> {
        let finals = self.results.get(&SeriesKey::FINALS)?;
        finals.side(finals.winner()?).alliance
    }

    /// Connector paths for this bracket's topology.
    pub fn project(
        &self,
        projector: &PathProjector,
        geometry: &HashMap<SeriesKey, CardGeometry>,
        container: BoundingBox,
    ) -> Vec<ConnectorPath> {
        projector.project(self.topology.edges(), &self.results, geometry, container)
    }
}
