use crate::app::MenuItem;
use chrono::{DateTime, Local};
use log::debug;
use playoff_engine::snapshot::Event;
use playoff_engine::{AllianceNumber, Bracket, SeriesKey, SeriesResult, Topology};

// ---------------------------------------------------------------------------
// Bracket / event state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct BracketState {
    pub event_key: Option<String>,
    pub event_name: String,
    pub year: Option<u16>,
    pub bracket: Option<Bracket>,
    /// Index into `topology().series()`; shared by the Bracket and Series tabs.
    pub selected: usize,
    /// Alliance whose advancement path is emphasized.
    pub focused_alliance: Option<AllianceNumber>,
    /// Vertical scroll offset for when cards exceed terminal height.
    pub scroll_offset: u16,
    /// Scroll to the selected card on next draw; manual scrolling clears it.
    pub follow_selection: bool,
    pub last_loaded: Option<DateTime<Local>>,
}

impl BracketState {
    /// Replace everything with a freshly loaded event.
    pub fn load(&mut self, event: Event) {
        self.selected = 0;
        self.scroll_offset = 0;
        self.follow_selection = true;
        self.focused_alliance = None;
        self.store(event);
    }

    /// Swap in re-read data, keeping the selection if it is still the same event.
    pub fn refresh(&mut self, event: Event) {
        if self.event_key.as_deref() != Some(event.key.as_str()) {
            debug!("event key changed to {}, resetting selection", event.key);
            self.load(event);
            return;
        }
        self.store(event);
        let count = self.topology().series().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    fn store(&mut self, event: Event) {
        self.bracket = Some(Bracket::from_event(&event));
        self.event_name = event.name;
        self.year = event.year;
        self.event_key = Some(event.key);
        self.last_loaded = Some(Local::now());
    }

    pub fn topology(&self) -> Topology {
        self.bracket.as_ref().map(|b| b.topology).unwrap_or_default()
    }

    pub fn selected_key(&self) -> Option<SeriesKey> {
        self.bracket.as_ref()?;
        self.topology().series().get(self.selected).copied()
    }

    pub fn selected_result(&self) -> Option<&SeriesResult> {
        self.bracket.as_ref()?.result(self.selected_key()?)
    }

    pub fn navigate_next(&mut self) {
        let max = self.topology().series().len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
        self.follow_selection = true;
    }

    pub fn navigate_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection = true;
    }

    /// Move to the series the selected one's winner advances to.
    pub fn navigate_forward(&mut self) {
        let topology = self.topology();
        if let Some(next) = self.selected_key().and_then(|k| topology.feeds_into(k)) {
            self.select_key(next);
        }
    }

    /// Move back to the first series feeding the selected one.
    pub fn navigate_back(&mut self) {
        let topology = self.topology();
        if let Some(prev) = self.selected_key().and_then(|k| topology.fed_by(k).first().copied()) {
            self.select_key(prev);
        }
    }

    pub fn select_key(&mut self, key: SeriesKey) {
        if let Some(index) = self.topology().series().iter().position(|k| *k == key) {
            self.selected = index;
            self.follow_selection = true;
        }
    }

    pub fn toggle_focus(&mut self, alliance: AllianceNumber) {
        self.focused_alliance = match self.focused_alliance {
            Some(current) if current == alliance => None,
            _ => Some(alliance),
        };
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(rows);
        self.follow_selection = false;
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
        self.follow_selection = false;
    }

    /// Keep the scroll offset inside `0..=content - viewport`.
    pub fn clamp_scroll(&mut self, content_height: u16, viewport_height: u16) {
        self.scroll_offset = self.scroll_offset.min(content_height.saturating_sub(viewport_height));
    }

    /// Adjust the scroll offset so rows `top..bottom` fit a viewport `height` tall.
    pub fn keep_visible(&mut self, top: u16, bottom: u16, height: u16) {
        if !self.follow_selection {
            return;
        }
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if bottom > self.scroll_offset + height {
            self.scroll_offset = bottom.saturating_sub(height);
        }
    }
}

/// Series won and lost by one alliance among the decided series so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesRecord {
    pub won: usize,
    pub lost: usize,
}

pub fn series_record(bracket: &Bracket, alliance: AllianceNumber) -> SeriesRecord {
    bracket
        .results()
        .values()
        .filter_map(|r| Some((r.side_of(alliance)?, r.winner()?)))
        .fold(SeriesRecord::default(), |mut rec, (side, winner)| {
            if side == winner {
                rec.won += 1;
            } else {
                rec.lost += 1;
            }
            rec
        })
}

// ---------------------------------------------------------------------------
// Alliance list state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AllianceListState {
    pub selected: usize,
}

impl AllianceListState {
    pub fn navigate_down(&mut self, count: usize) {
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub bracket: BracketState,
    pub alliances: AllianceListState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playoff_engine::CompLevel;
    use playoff_engine::snapshot::load_demo;

    fn loaded() -> BracketState {
        let mut state = BracketState::default();
        state.load(load_demo().unwrap());
        state
    }

    fn sf(set: u32) -> SeriesKey {
        SeriesKey::new(CompLevel::Semi, set)
    }

    #[test]
    fn nothing_selected_before_load() {
        let state = BracketState::default();
        assert_eq!(state.selected_key(), None);
        assert!(state.selected_result().is_none());
    }

    #[test]
    fn load_selects_first_series() {
        let state = loaded();
        assert_eq!(state.selected_key(), Some(sf(1)));
        assert_eq!(state.event_key.as_deref(), Some("2024demo"));
        assert!(state.last_loaded.is_some());
    }

    #[test]
    fn next_and_prev_stay_in_bounds() {
        let mut state = loaded();
        state.navigate_prev();
        assert_eq!(state.selected, 0);
        for _ in 0..100 {
            state.navigate_next();
        }
        assert_eq!(state.selected, state.topology().series().len() - 1);
    }

    #[test]
    fn forward_follows_winner_edge() {
        let mut state = loaded();
        state.navigate_forward();
        assert_eq!(state.selected_key(), Some(sf(7)));
        state.navigate_back();
        assert_eq!(state.selected_key(), Some(sf(1)));
    }

    #[test]
    fn forward_from_finals_stays_put() {
        let mut state = loaded();
        state.select_key(SeriesKey::FINALS);
        state.navigate_forward();
        assert_eq!(state.selected_key(), Some(SeriesKey::FINALS));
    }

    #[test]
    fn refresh_same_event_keeps_selection() {
        let mut state = loaded();
        state.select_key(sf(11));
        state.toggle_focus(AllianceNumber::new(1).unwrap());
        state.refresh(load_demo().unwrap());
        assert_eq!(state.selected_key(), Some(sf(11)));
        assert_eq!(state.focused_alliance, AllianceNumber::new(1));
    }

    #[test]
    fn refresh_other_event_resets_selection() {
        let mut state = loaded();
        state.select_key(sf(11));
        let mut other = load_demo().unwrap();
        other.key = "2024other".to_string();
        state.refresh(other);
        assert_eq!(state.selected, 0);
        assert_eq!(state.event_key.as_deref(), Some("2024other"));
    }

    #[test]
    fn toggle_focus_clears_on_second_press() {
        let mut state = loaded();
        let a2 = AllianceNumber::new(2).unwrap();
        state.toggle_focus(a2);
        assert_eq!(state.focused_alliance, Some(a2));
        state.toggle_focus(a2);
        assert_eq!(state.focused_alliance, None);
    }

    #[test]
    fn keep_visible_scrolls_both_ways() {
        let mut state = BracketState { follow_selection: true, ..Default::default() };
        state.keep_visible(30, 34, 10);
        assert_eq!(state.scroll_offset, 24);
        state.keep_visible(2, 6, 10);
        assert_eq!(state.scroll_offset, 2);
        state.keep_visible(4, 8, 10);
        assert_eq!(state.scroll_offset, 2);
    }

    #[test]
    fn manual_scroll_stops_following_selection() {
        let mut state = loaded();
        state.scroll_down(5);
        state.keep_visible(0, 4, 10);
        assert_eq!(state.scroll_offset, 5);
        state.navigate_next();
        state.keep_visible(0, 4, 10);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn clamp_scroll_limits_to_content() {
        let mut state = loaded();
        state.scroll_down(100);
        state.clamp_scroll(40, 30);
        assert_eq!(state.scroll_offset, 10);
        state.clamp_scroll(20, 30);
        assert_eq!(state.scroll_offset, 0);
    }

    #[test]
    fn record_counts_decided_series_only() {
        let state = loaded();
        let bracket = state.bracket.as_ref().unwrap();
        // Alliance 1 won Match 1, Match 7 and Match 11.
        assert_eq!(series_record(bracket, AllianceNumber::new(1).unwrap()), SeriesRecord { won: 3, lost: 0 });
        // Alliance 8 lost Match 1 and Match 5.
        assert_eq!(series_record(bracket, AllianceNumber::new(8).unwrap()), SeriesRecord { won: 0, lost: 2 });
        // Alliance 2's Match 12 is still unplayed.
        assert_eq!(series_record(bracket, AllianceNumber::new(2).unwrap()), SeriesRecord { won: 2, lost: 1 });
    }

    #[test]
    fn alliance_list_navigation_is_bounded() {
        let mut list = AllianceListState::default();
        list.navigate_up();
        assert_eq!(list.selected, 0);
        list.navigate_down(2);
        list.navigate_down(2);
        assert_eq!(list.selected, 1);
    }
}
