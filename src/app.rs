use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use log::info;
use playoff_engine::snapshot::Event;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Alliances,
    Series,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self { state: AppState::new(), settings }
    }

    // -----------------------------------------------------------------------
    // Snapshot response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_event_loaded(&mut self, event: Event) {
        info!("loaded {} ({} matches)", event.key, event.matches.len());
        self.state.last_error = None;
        self.state.bracket.load(event);
        self.state.alliances = Default::default();
    }

    pub fn on_event_refreshed(&mut self, event: Event) {
        self.state.last_error = None;
        self.state.bracket.refresh(event);
        let count = self.alliance_count();
        if self.state.alliances.selected >= count {
            self.state.alliances.selected = count.saturating_sub(1);
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Bracket navigation, delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn series_next(&mut self) {
        self.state.bracket.navigate_next();
    }

    pub fn series_prev(&mut self) {
        self.state.bracket.navigate_prev();
    }

    pub fn series_forward(&mut self) {
        self.state.bracket.navigate_forward();
    }

    pub fn series_back(&mut self) {
        self.state.bracket.navigate_back();
    }

    /// Emphasize the path of the selected series's winner.
    pub fn focus_selected_winner(&mut self) {
        let winner = self
            .state
            .bracket
            .selected_result()
            .and_then(|r| r.winner().and_then(|side| r.side(side).alliance));
        if let Some(alliance) = winner {
            self.state.bracket.toggle_focus(alliance);
        }
    }

    // -----------------------------------------------------------------------
    // Alliance list
    // -----------------------------------------------------------------------

    fn alliance_count(&self) -> usize {
        self.state.bracket.bracket.as_ref().map(|b| b.alliances().len()).unwrap_or(0)
    }

    pub fn alliance_down(&mut self) {
        let count = self.alliance_count();
        self.state.alliances.navigate_down(count);
    }

    pub fn alliance_up(&mut self) {
        self.state.alliances.navigate_up();
    }

    /// Jump to the Bracket tab with the highlighted alliance's path emphasized.
    pub fn show_alliance_path(&mut self) {
        let selected = self.state.alliances.selected;
        let number = self
            .state
            .bracket
            .bracket
            .as_ref()
            .and_then(|b| b.alliances().get(selected))
            .map(|a| a.number);
        if let Some(number) = number {
            self.state.bracket.focused_alliance = Some(number);
            self.update_tab(MenuItem::Bracket);
        }
    }
}
