//! Container actor - one thread owns the container, everybody else sends
//! requests.
//!
//! The container (and the sessions inside it) are built on the actor thread
//! and never leave it. Requests are processed strictly one at a time, so a
//! listener that reacts to a notification by sending another request only
//! sees it applied after the current transition has finished.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info};

use crate::core::listener::SessionChangeListener;
use crate::core::session::{SessionFactory, SessionId};
use super::container::{DisplayMode, TabContainer};
use super::event::ContainerEvent;
use super::tab::TabInfo;

#[derive(Error, Debug)]
pub enum ActorError<E> {
    #[error("Container actor has stopped")]
    Stopped,

    #[error("Session factory failed: {0}")]
    Factory(E),
}

/// State snapshot returned by [`ContainerHandle::snapshot`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub mode: DisplayMode,
    pub current: Option<SessionId>,
    pub tabs: Vec<TabInfo>,
}

enum Request<E> {
    Event(ContainerEvent, Sender<Result<Option<SessionId>, E>>),
    SetListener(Arc<dyn SessionChangeListener>),
    Snapshot(Sender<ContainerSnapshot>),
    Shutdown,
}

/// Cloneable sender side of a [`ContainerActor`]
pub struct ContainerHandle<E> {
    tx: Sender<Request<E>>,
}

impl<E> Clone for ContainerHandle<E> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<E> ContainerHandle<E> {
    fn event(&self, event: ContainerEvent) -> Result<Option<SessionId>, ActorError<E>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Request::Event(event, reply_tx))
            .map_err(|_| ActorError::Stopped)?;
        reply_rx
            .recv()
            .map_err(|_| ActorError::Stopped)?
            .map_err(ActorError::Factory)
    }

    pub fn create_session(&self) -> Result<SessionId, ActorError<E>> {
        self.event(ContainerEvent::CreateSession)?
            .ok_or(ActorError::Stopped)
    }

    pub fn select_tab(&self, index: usize) -> Result<(), ActorError<E>> {
        self.event(ContainerEvent::SelectTab(index)).map(|_| ())
    }

    /// Close a tabbed session. Closing anything else is a caller bug and
    /// stops the actor; later requests then fail with `Stopped`.
    pub fn close(&self, session: SessionId) -> Result<(), ActorError<E>> {
        self.event(ContainerEvent::CloseTab(session)).map(|_| ())
    }

    pub fn set_session_change_listener(
        &self,
        listener: Arc<dyn SessionChangeListener>,
    ) -> Result<(), ActorError<E>> {
        self.tx
            .send(Request::SetListener(listener))
            .map_err(|_| ActorError::Stopped)
    }

    pub fn snapshot(&self) -> Result<ContainerSnapshot, ActorError<E>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Request::Snapshot(reply_tx))
            .map_err(|_| ActorError::Stopped)?;
        reply_rx.recv().map_err(|_| ActorError::Stopped)
    }

    pub fn current_session(&self) -> Result<Option<SessionId>, ActorError<E>> {
        self.snapshot().map(|s| s.current)
    }
}

/// Owns the container thread
pub struct ContainerActor<E> {
    handle: ContainerHandle<E>,
    thread: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> ContainerActor<E> {
    /// Start the actor. `build` runs on the actor thread, so neither the
    /// factory nor its sessions need to be `Send`.
    pub fn spawn<F, B>(build: B) -> Self
    where
        F: SessionFactory<Error = E>,
        B: FnOnce() -> TabContainer<F> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Request<E>>();
        let thread = thread::spawn(move || {
            let container = build();
            run(container, rx);
        });
        Self {
            handle: ContainerHandle { tx },
            thread: Some(thread),
        }
    }
}

impl<E> ContainerActor<E> {
    pub fn handle(&self) -> ContainerHandle<E> {
        self.handle.clone()
    }

    /// Stop the actor and wait for its thread
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.handle.tx.send(Request::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl<E> Drop for ContainerActor<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<F: SessionFactory>(mut container: TabContainer<F>, rx: Receiver<Request<F::Error>>) {
    info!("Container actor started");
    for request in rx {
        match request {
            Request::Event(event, reply) => {
                let result = container.handle(event);
                let _ = reply.send(result);
            }
            Request::SetListener(listener) => {
                container.set_session_change_listener(listener);
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(ContainerSnapshot {
                    mode: container.mode(),
                    current: container.current_session_id(),
                    tabs: container.tabs(),
                });
            }
            Request::Shutdown => break,
        }
    }
    debug!("Container actor stopped");
}
