mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::loader::{LoadingState, SnapshotSource, SnapshotWorker};
use crate::state::messages::{DataRequest, DataResponse, UiEvent};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, error, info};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run { event_path: Option<PathBuf> },
    Help,
    Version,
    Invalid(String),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = AppSettings::load();
    match parse_cli_args(std::env::args().skip(1)) {
        CliCommand::Run { event_path } => {
            if let Some(path) = event_path {
                settings.source = SnapshotSource::File(path);
            }
        }
        CliCommand::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        CliCommand::Version => {
            println!("frctui {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        CliCommand::Invalid(arg) => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let level = settings.log_level.unwrap_or(LevelFilter::Error);
    tui_logger::init_logger(level)?;
    tui_logger::set_default_level(level);
    info!("reading events from {}", settings.source);

    let source = settings.source.clone();
    let refresh_period = settings.effective_refresh_period();
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (data_req_tx, data_req_rx) = mpsc::channel::<DataRequest>(100);
    let (data_resp_tx, data_resp_rx) = mpsc::channel::<DataResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Snapshot loader thread
    let snapshot_worker = SnapshotWorker::new(source, data_req_rx, data_resp_tx);
    let snapshot_task = tokio::spawn(snapshot_worker.run());

    // Periodic reload thread, file sources only
    let periodic_task = refresh_period.map(|period| {
        let refresher = PeriodicRefresher::new(data_req_tx.clone(), period);
        tokio::spawn(refresher.run())
    });

    // Trigger event load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, data_req_tx, data_resp_rx).await;

    input_handler.abort();
    snapshot_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }

    Ok(())
}

fn parse_cli_args(mut args: impl Iterator<Item = String>) -> CliCommand {
    let Some(arg) = args.next() else {
        return CliCommand::Run { event_path: None };
    };

    match arg.as_str() {
        "-h" | "--help" => CliCommand::Help,
        "-V" | "--version" => CliCommand::Version,
        flag if flag.starts_with('-') => CliCommand::Invalid(arg),
        _ => match args.next() {
            Some(extra) => CliCommand::Invalid(extra),
            None => CliCommand::Run { event_path: Some(PathBuf::from(arg)) },
        },
    }
}

fn usage_text() -> &'static str {
    "frctui - FRC playoff bracket terminal UI

Usage:
  frctui [EVENT_JSON]
  frctui --help
  frctui --version

Arguments:
  EVENT_JSON           Event snapshot to show (overrides FRCTUI_EVENT_JSON)

Environment:
  FRCTUI_EVENT_JSON    Path to an event snapshot (default: built-in demo)
  FRCTUI_REFRESH_SECS  Reload the snapshot file every N seconds (default 30, 0 = off)
  FRCTUI_LOG_LEVEL     error, warn, info, debug or trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    data_requests: mpsc::Sender<DataRequest>,
    mut data_responses: mpsc::Receiver<DataResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &data_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = data_responses.recv() => {
                let should_redraw = handle_data_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    data_requests: &mpsc::Sender<DataRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = data_requests.send(DataRequest::LoadEvent).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, data_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_data_response(
    response: DataResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        DataResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        DataResponse::EventLoaded { event } => {
            let mut guard = app.lock().await;
            guard.on_event_loaded(event);
        }
        DataResponse::EventRefreshed { event } => {
            let mut guard = app.lock().await;
            if guard.state.bracket.bracket.is_some() {
                guard.on_event_refreshed(event);
            } else {
                guard.on_event_loaded(event);
            }
        }
        DataResponse::Error { message } => {
            error!("Snapshot error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let event = tokio::task::spawn_blocking(crossterm_event::read).await;
        let Ok(Ok(event)) = event else {
            continue;
        };
        let ui_event = match event {
            Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    // Best effort: this also runs from the panic hook.
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
