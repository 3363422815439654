// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::errors::Result;
use crate::exec::SpawnBackend;
use crate::watch::Notification;

use super::core::{Dispatch, Dispatcher};
use super::RuntimeEvent;

/// Pumps `RuntimeEvent`s into the [`Dispatcher`] and hands every spawn
/// decision to a `SpawnBackend`.
///
/// The loop is idle while awaiting the next event and processes each event to
/// completion before reading the next one; no two notifications are ever
/// dispatched concurrently. Spawned commands run on their own and are never
/// awaited here.
pub struct DispatchLoop<S: SpawnBackend> {
    dispatcher: Dispatcher,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: S,
}

impl<S: SpawnBackend> fmt::Debug for DispatchLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchLoop")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl<S: SpawnBackend> DispatchLoop<S> {
    pub fn new(dispatcher: Dispatcher, event_rx: mpsc::Receiver<RuntimeEvent>, backend: S) -> Self {
        Self {
            dispatcher,
            event_rx,
            backend,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Main event loop.
    ///
    /// Runs until the event channel closes or a shutdown is requested. A
    /// command that cannot be launched ends the loop with that error.
    pub async fn run(mut self) -> Result<()> {
        info!("firewatch dispatch loop started");

        let result = loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("event channel closed; exiting");
                    break Ok(());
                }
            };

            match self.step(event) {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(err) => break Err(err),
            }
        };

        self.backend.shutdown();
        info!("dispatch loop exiting");
        result
    }

    /// Handle a single event. Returns whether the loop should keep running.
    pub fn step(&mut self, event: RuntimeEvent) -> Result<bool> {
        trace!(?event, "dispatching");
        match event {
            RuntimeEvent::Notification(notification) => {
                self.dispatch(&notification)?;
                Ok(true)
            }
            RuntimeEvent::ReapRequested => {
                self.backend.reap();
                Ok(true)
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                Ok(false)
            }
        }
    }

    /// Dispatch one notification; returns the spawned pid, if any.
    pub fn dispatch(&mut self, notification: &Notification) -> Result<Option<u32>> {
        match self.dispatcher.decide(notification) {
            Dispatch::Ignored(reason) => {
                debug!(path = ?notification.path, ?reason, "notification ignored");
                Ok(None)
            }
            Dispatch::Spawn {
                entry,
                real_path,
                event,
            } => {
                let pid = self.backend.spawn(entry, &real_path, event)?;
                Ok(Some(pid))
            }
        }
    }
}
