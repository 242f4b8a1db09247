use crate::app::{App, MenuItem};
use crate::state::messages::DataRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

const PAGE_ROWS: u16 = 5;

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    data_requests: &mpsc::Sender<DataRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Alliances),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Series),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.series_next(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.series_prev(),
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.series_forward(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.series_back(),
        (MenuItem::Bracket, KeyCode::Enter, _) => guard.focus_selected_winner(),
        (MenuItem::Bracket, KeyCode::PageDown, _) => guard.state.bracket.scroll_down(PAGE_ROWS),
        (MenuItem::Bracket, KeyCode::PageUp, _) => guard.state.bracket.scroll_up(PAGE_ROWS),

        // Series table navigation
        (MenuItem::Series, Char('j') | KeyCode::Down, _) => guard.series_next(),
        (MenuItem::Series, Char('k') | KeyCode::Up, _) => guard.series_prev(),
        (MenuItem::Series, KeyCode::Enter, _) => guard.update_tab(MenuItem::Bracket),

        // Alliance table navigation
        (MenuItem::Alliances, Char('j') | KeyCode::Down, _) => guard.alliance_down(),
        (MenuItem::Alliances, Char('k') | KeyCode::Up, _) => guard.alliance_up(),
        (MenuItem::Alliances, KeyCode::Enter, _) => guard.show_alliance_path(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),
        (_, Char('r'), _) => {
            drop(guard);
            let _ = data_requests.send(DataRequest::RefreshEvent).await;
        }

        _ => {}
    }
}
