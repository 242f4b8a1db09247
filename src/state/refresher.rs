use crate::state::messages::DataRequest;
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Re-reads the event snapshot on a fixed period so a file another process
/// keeps rewriting shows up without a keypress.
pub struct PeriodicRefresher {
    data_requests: mpsc::Sender<DataRequest>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(data_requests: mpsc::Sender<DataRequest>, period: Duration) -> Self {
        Self { data_requests, period }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            debug!("periodic snapshot refresh");
            if self.data_requests.send(DataRequest::RefreshEvent).await.is_err() {
                break;
            }
        }
    }
}
