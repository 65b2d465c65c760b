//! Engine - owns the dispatcher and reload tasks

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::application::errors::{BotError, ReloadError};
use crate::application::messaging::MessageRouter;
use crate::application::services::{ConfigStore, ReloadOutcome, ReloadTrigger, RetryPolicy};
use crate::domain::entities::ChatMessage;
use crate::domain::traits::{ChatTransport, Clock, MonotonicClock};
use crate::infrastructure::storage::JsonCommandFile;
use crate::infrastructure::watcher::ConfigWatcher;

/// Capacity of the change notification queue
const WATCH_QUEUE: usize = 64;

/// How long `stop` waits for an in-progress dispatch before aborting it
const STOP_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub commands_path: PathBuf,
    pub debounce: Duration,
    pub retry: RetryPolicy,
}

/// Running engine.
///
/// Inbound messages are handled one at a time by a single dispatcher task.
/// Reloads run on their own task and only touch shared state for the swap.
pub struct Engine {
    store: Arc<ConfigStore>,
    watcher: Option<ConfigWatcher>,
    reload_task: Option<JoinHandle<()>>,
    dispatcher: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Engine {
    pub async fn start(
        settings: EngineSettings,
        transport: Arc<dyn ChatTransport>,
        inbound: mpsc::Receiver<ChatMessage>,
    ) -> Result<Self, BotError> {
        Self::start_with_clock(settings, transport, inbound, Arc::new(MonotonicClock::new())).await
    }

    pub async fn start_with_clock(
        settings: EngineSettings,
        transport: Arc<dyn ChatTransport>,
        inbound: mpsc::Receiver<ChatMessage>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BotError> {
        // Subscribe before the first load so no edit slips between the two.
        let (tx, rx) = mpsc::channel(WATCH_QUEUE);
        let watcher = ConfigWatcher::spawn(&settings.commands_path, tx)?;

        let source = Arc::new(JsonCommandFile::new(&settings.commands_path));
        let store = Arc::new(ConfigStore::open(source, settings.retry).await);
        tracing::info!("Loaded {} command(s)", store.table().len());

        let reload_task = ReloadTrigger::new(&settings.commands_path, settings.debounce)
            .spawn(Arc::clone(&store), rx);

        let router = MessageRouter::new(Arc::clone(&store), clock);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let dispatcher = tokio::spawn(run_dispatcher(
            router,
            transport,
            inbound,
            shutdown_rx,
        ));

        Ok(Self {
            store,
            watcher: Some(watcher),
            reload_task: Some(reload_task),
            dispatcher: Some(dispatcher),
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn is_running(&self) -> bool {
        self.dispatcher.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Reload right away, bypassing the watcher and its debounce.
    pub async fn reload_now(&self) -> Result<ReloadOutcome, ReloadError> {
        self.store.reload().await
    }

    /// Wait until the inbound stream closes.
    pub async fn wait(&mut self) {
        if let Some(task) = self.dispatcher.as_mut() {
            if let Err(e) = task.await {
                tracing::error!("Dispatcher task failed: {}", e);
            }
            self.dispatcher = None;
        }
    }

    /// Unsubscribe from the filesystem, abandon any in-flight reload and stop
    /// the dispatcher. A dispatch still running after `STOP_GRACE` is
    /// aborted. The store stays readable afterwards.
    pub async fn stop(&mut self) {
        self.watcher.take();

        if let Some(task) = self.reload_task.take() {
            task.abort();
            let _ = task.await;
        }

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(mut task) = self.dispatcher.take() {
            match tokio::time::timeout(STOP_GRACE, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Dispatcher task failed: {}", e),
                Err(_) => {
                    tracing::warn!("Dispatcher still busy after {:?}, aborting", STOP_GRACE);
                    task.abort();
                    let _ = task.await;
                }
            }
        }

        tracing::info!("Engine stopped");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(task) = self.reload_task.take() {
            task.abort();
        }
        if let Some(task) = self.dispatcher.take() {
            task.abort();
        }
    }
}

async fn run_dispatcher(
    router: MessageRouter,
    transport: Arc<dyn ChatTransport>,
    mut inbound: mpsc::Receiver<ChatMessage>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let info = transport.info();
    tracing::info!("Dispatching messages for #{} via {}", info.channel, info.name);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            message = inbound.recv() => match message {
                Some(message) => {
                    router.handle(&message, transport.as_ref()).await;
                }
                None => break,
            },
        }
    }

    tracing::debug!("Dispatcher stopped");
}
