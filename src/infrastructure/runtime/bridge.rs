//! Runtime bridge - connects sync TUI thread with async Tokio runtime
//!
//! The TUI thread sends [`RuntimeCommand`]s and drains [`RuntimeEvent`]s each
//! frame; all network I/O happens on the worker thread.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use tokio::runtime::Runtime;

use crate::domain::{DashboardData, DashboardQuery, FetchError, ModuleInfo, RequestToken, SchemeProbe};
use crate::infrastructure::api::DashboardApi;
use crate::infrastructure::runtime::worker::run_async_worker;

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Fetch dashboard data; the token comes back with the result
    FetchDashboard {
        token: RequestToken,
        query: DashboardQuery,
    },
    /// Fetch the backend module list
    FetchModules,
    /// Shutdown the worker
    Shutdown,
}

/// Events sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    DashboardLoaded {
        token: RequestToken,
        result: Result<DashboardData, FetchError>,
    },
    ModulesLoaded {
        result: Result<Vec<ModuleInfo>, FetchError>,
    },
    /// The system colour scheme changed
    SchemeChanged { prefers_dark: bool },
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    cmd_tx: Sender<RuntimeCommand>,
    evt_rx: Receiver<RuntimeEvent>,
}

impl RuntimeBridge {
    /// Spawn the worker thread with its own Tokio runtime
    pub fn new(api: Arc<dyn DashboardApi>, probe: Box<dyn SchemeProbe>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<RuntimeCommand>();
        let (evt_tx, evt_rx) = mpsc::channel::<RuntimeEvent>();
        let rt = Runtime::new()?;

        thread::Builder::new()
            .name("secdash-runtime".to_string())
            .spawn(move || {
                rt.block_on(run_async_worker(api, probe, cmd_rx, evt_tx));
            })?;

        Ok(Self { cmd_tx, evt_rx })
    }

    /// Send a command to the async worker
    pub fn send(&self, cmd: RuntimeCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow::anyhow!("Worker channel closed"))
    }

    /// Poll for events (non-blocking)
    pub fn poll_events(&self) -> Vec<RuntimeEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}
