//! Session abstraction
//!
//! The container never looks inside a terminal session. It only needs a
//! surface to display, a natural size, a way to close it and a slot for the
//! panel listener. Everything else (PTY, emulation, rendering) lives behind
//! the [`Session`] trait.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::listener::SessionChangeListener;

/// Unique identifier the container assigns to every hosted session
pub type SessionId = u64;

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to something that can be shown on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    /// Allocate a fresh, process-wide unique surface handle
    pub fn allocate() -> Self {
        Self(NEXT_SURFACE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Size of a display surface in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// A running terminal session as seen by the tab container.
///
/// `close` is called exactly once by the container, when the session's tab
/// is closed. Idempotence is not required.
pub trait Session {
    /// Surface to install as visible content
    fn display_surface(&self) -> SurfaceHandle;

    /// Size the session would like to be shown at
    fn natural_size(&self) -> Size;

    /// Release the underlying resources (process, rendering surface)
    fn close(&mut self);

    /// Route panel-level events (resize etc.) to `listener`
    fn set_panel_listener(&mut self, listener: Arc<dyn SessionChangeListener>);

    /// Ask for input focus
    fn request_focus(&mut self) {}
}

/// Creates sessions on behalf of the container.
///
/// Errors are handed back to the caller of
/// [`TabContainer::create_session`](crate::wm::TabContainer::create_session)
/// untouched.
pub trait SessionFactory {
    type Session: Session;
    type Error;

    fn create_session(&mut self) -> Result<Self::Session, Self::Error>;
}

impl<S, E, F> SessionFactory for F
where
    S: Session,
    F: FnMut() -> Result<S, E>,
{
    type Session = S;
    type Error = E;

    fn create_session(&mut self) -> Result<S, E> {
        self()
    }
}
