//! Async worker - runs in Tokio runtime and handles API requests

use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;

use crate::domain::SchemeProbe;
use crate::infrastructure::api::DashboardApi;
use crate::infrastructure::runtime::bridge::{RuntimeCommand, RuntimeEvent};

const COMMAND_POLL: Duration = Duration::from_millis(50);
const SCHEME_POLL: Duration = Duration::from_secs(2);

/// Run the async worker loop until [`RuntimeCommand::Shutdown`] or the TUI hangs up
pub async fn run_async_worker(
    api: Arc<dyn DashboardApi>,
    probe: Box<dyn SchemeProbe>,
    cmd_rx: Receiver<RuntimeCommand>,
    evt_tx: Sender<RuntimeEvent>,
) {
    let mut command_interval = interval(COMMAND_POLL);
    let mut scheme_interval = interval(SCHEME_POLL);
    let mut scheme = SchemeWatcher::new(probe.prefers_dark());

    loop {
        tokio::select! {
            _ = command_interval.tick() => {
                loop {
                    match cmd_rx.try_recv() {
                        Ok(RuntimeCommand::Shutdown) => {
                            tracing::debug!("worker shutting down");
                            return;
                        }
                        Ok(cmd) => dispatch(cmd, &api, &evt_tx),
                        Err(std::sync::mpsc::TryRecvError::Empty) => break,
                        Err(std::sync::mpsc::TryRecvError::Disconnected) => return,
                    }
                }
            }
            _ = scheme_interval.tick() => {
                if let Some(prefers_dark) = scheme.observe(probe.prefers_dark()) {
                    let _ = evt_tx.send(RuntimeEvent::SchemeChanged { prefers_dark });
                }
            }
        }
    }
}

/// Each request runs as its own task, so requests may overlap
fn dispatch(cmd: RuntimeCommand, api: &Arc<dyn DashboardApi>, evt_tx: &Sender<RuntimeEvent>) {
    match cmd {
        RuntimeCommand::FetchDashboard { token, query } => {
            let api = Arc::clone(api);
            let evt_tx = evt_tx.clone();
            tokio::spawn(async move {
                tracing::info!(token, ?query, "fetching dashboard data");
                let result = api.dashboard_data(&query).await;
                match &result {
                    Ok(_) => tracing::info!(token, "dashboard data received"),
                    Err(err) => tracing::warn!(token, "dashboard fetch failed: {err}"),
                }
                let _ = evt_tx.send(RuntimeEvent::DashboardLoaded { token, result });
            });
        }
        RuntimeCommand::FetchModules => {
            let api = Arc::clone(api);
            let evt_tx = evt_tx.clone();
            tokio::spawn(async move {
                let result = api.modules().await;
                if let Err(err) = &result {
                    tracing::warn!("module list fetch failed: {err}");
                }
                let _ = evt_tx.send(RuntimeEvent::ModulesLoaded { result });
            });
        }
        RuntimeCommand::Shutdown => {}
    }
}

/// Reports a system preference only when it differs from the last known one
#[derive(Debug, Clone, Copy)]
struct SchemeWatcher {
    last: Option<bool>,
}

impl SchemeWatcher {
    fn new(initial: Option<bool>) -> Self {
        Self { last: initial }
    }

    fn observe(&mut self, current: Option<bool>) -> Option<bool> {
        let current = current?;
        if self.last == Some(current) {
            return None;
        }
        self.last = Some(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DashboardData, DashboardQuery, DataPoint, FetchError, ModuleInfo};

    struct FakeApi;

    #[async_trait::async_trait]
    impl DashboardApi for FakeApi {
        async fn dashboard_data(&self, query: &DashboardQuery) -> Result<DashboardData, FetchError> {
            if query.year < 2000 {
                return Err(FetchError::Request {
                    status: 400,
                    status_text: "Bad Request".to_string(),
                });
            }
            Ok(DashboardData {
                tech_data: vec![DataPoint {
                    name: "SIEM".to_string(),
                    value: query.month as f64,
                    color: "#F56565".to_string(),
                }],
                ..Default::default()
            })
        }

        async fn modules(&self) -> Result<Vec<ModuleInfo>, FetchError> {
            Ok(Vec::new())
        }
    }

    struct NoProbe;

    impl SchemeProbe for NoProbe {
        fn prefers_dark(&self) -> Option<bool> {
            None
        }
    }

    fn query(month: u8, year: i32) -> DashboardQuery {
        DashboardQuery {
            view_type: "monthly",
            display_type: "total",
            week: 1,
            month,
            year,
        }
    }

    async fn next_event(rx: &Receiver<RuntimeEvent>) -> RuntimeEvent {
        for _ in 0..200 {
            if let Ok(evt) = rx.try_recv() {
                return evt;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no event from worker");
    }

    #[tokio::test]
    async fn test_fetch_round_trip_keeps_token() {
        let (cmd_tx, cmd_rx) = std::sync::mpsc::channel();
        let (evt_tx, evt_rx) = std::sync::mpsc::channel();
        let worker = tokio::spawn(run_async_worker(
            Arc::new(FakeApi),
            Box::new(NoProbe),
            cmd_rx,
            evt_tx,
        ));

        cmd_tx
            .send(RuntimeCommand::FetchDashboard {
                token: 7,
                query: query(4, 2024),
            })
            .unwrap();
        match next_event(&evt_rx).await {
            RuntimeEvent::DashboardLoaded { token, result } => {
                assert_eq!(token, 7);
                assert_eq!(result.unwrap().tech_data[0].value, 4.0);
            }
            other => panic!("unexpected event {other:?}"),
        }

        cmd_tx
            .send(RuntimeCommand::FetchDashboard {
                token: 8,
                query: query(4, 1999),
            })
            .unwrap();
        match next_event(&evt_rx).await {
            RuntimeEvent::DashboardLoaded { token, result } => {
                assert_eq!(token, 8);
                assert_eq!(result.unwrap_err().to_string(), "Erreur 400: Bad Request");
            }
            other => panic!("unexpected event {other:?}"),
        }

        cmd_tx.send(RuntimeCommand::Shutdown).unwrap();
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_stops_when_tui_hangs_up() {
        let (cmd_tx, cmd_rx) = std::sync::mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = std::sync::mpsc::channel();
        let worker = tokio::spawn(run_async_worker(
            Arc::new(FakeApi),
            Box::new(NoProbe),
            cmd_rx,
            evt_tx,
        ));

        drop(cmd_tx);
        tokio::time::timeout(Duration::from_secs(2), worker)
            .await
            .unwrap()
            .unwrap();
        assert!(evt_rx.try_recv().is_err());
    }

    #[test]
    fn test_scheme_watcher_reports_changes_only() {
        let mut watcher = SchemeWatcher::new(Some(false));
        assert_eq!(watcher.observe(Some(false)), None);
        assert_eq!(watcher.observe(None), None);
        assert_eq!(watcher.observe(Some(true)), Some(true));
        assert_eq!(watcher.observe(Some(true)), None);

        let mut unknown = SchemeWatcher::new(None);
        assert_eq!(unknown.observe(Some(true)), Some(true));
    }
}
