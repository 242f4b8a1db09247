use crate::state::loader::LoadingState;
use crossterm::event::KeyEvent;
use playoff_engine::snapshot::Event;

#[derive(Debug, Clone)]
pub enum DataRequest {
    LoadEvent,
    /// Re-read the same source; the selection survives if the event key matches.
    RefreshEvent,
}

#[derive(Debug)]
pub enum DataResponse {
    LoadingStateChanged { loading_state: LoadingState },
    EventLoaded { event: Event },
    EventRefreshed { event: Event },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
