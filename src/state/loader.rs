use crate::state::messages::{DataRequest, DataResponse};
use log::{debug, error, info};
use playoff_engine::snapshot::{self, Event, SnapshotError, SnapshotResult};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Where event snapshots come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotSource {
    /// The demo event compiled into the engine crate.
    Demo,
    File(PathBuf),
}

impl SnapshotSource {
    /// A demo never changes, so there is nothing to poll.
    pub fn is_refreshable(&self) -> bool {
        matches!(self, SnapshotSource::File(_))
    }

    pub async fn load(&self) -> SnapshotResult<Event> {
        match self {
            SnapshotSource::Demo => snapshot::load_demo(),
            SnapshotSource::File(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|source| SnapshotError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                snapshot::parse(&content)
            }
        }
    }
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Demo => f.write_str("built-in demo"),
            SnapshotSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct SnapshotWorker {
    source: SnapshotSource,
    requests: mpsc::Receiver<DataRequest>,
    responses: mpsc::Sender<DataResponse>,
    is_loading: Arc<AtomicBool>,
}

impl SnapshotWorker {
    pub fn new(
        source: SnapshotSource,
        requests: mpsc::Receiver<DataRequest>,
        responses: mpsc::Sender<DataResponse>,
    ) -> Self {
        Self {
            source,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                DataRequest::LoadEvent => self.handle_load_event().await,
                DataRequest::RefreshEvent => self.handle_refresh_event().await,
            };

            debug!("snapshot request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| DataResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send snapshot response: {e}");
                break;
            }
        }
    }

    async fn handle_load_event(&self) -> SnapshotResult<DataResponse> {
        info!("loading event from {}", self.source);
        let event = self.source.load().await?;
        Ok(DataResponse::EventLoaded { event })
    }

    async fn handle_refresh_event(&self) -> SnapshotResult<DataResponse> {
        debug!("refreshing event from {}", self.source);
        let event = self.source.load().await?;
        Ok(DataResponse::EventRefreshed { event })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(DataResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(DataResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(DataResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
