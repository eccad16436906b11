//! Headless sessions
//!
//! A session without an emulator or PTY behind it. It owns a surface handle
//! and a size, tracks its lifecycle and forwards resizes to its panel
//! listener. The demo binary uses it to drive the container.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::listener::{RequestOrigin, SessionChangeListener};
use super::session::{Session, SessionFactory, Size, SurfaceHandle};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid session size: {0}")]
    InvalidSize(Size),

    #[error("Session is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// A session with no terminal behind it
pub struct HeadlessSession {
    surface: SurfaceHandle,
    size: Size,
    closed: bool,
    focused: bool,
    listener: Option<Arc<dyn SessionChangeListener>>,
}

impl HeadlessSession {
    pub fn new(size: Size) -> Result<Self> {
        if size.is_empty() {
            return Err(SessionError::InvalidSize(size));
        }
        Ok(Self {
            surface: SurfaceHandle::allocate(),
            size,
            closed: false,
            focused: false,
            listener: None,
        })
    }

    /// Resize the session and report it to the panel listener
    pub fn resize(&mut self, size: Size, origin: RequestOrigin) -> Result<()> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        if size.is_empty() {
            return Err(SessionError::InvalidSize(size));
        }
        self.size = size;
        if let Some(listener) = &self.listener {
            listener.on_panel_resize(size, origin);
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn has_panel_listener(&self) -> bool {
        self.listener.is_some()
    }
}

impl Session for HeadlessSession {
    fn display_surface(&self) -> SurfaceHandle {
        self.surface
    }

    fn natural_size(&self) -> Size {
        self.size
    }

    fn close(&mut self) {
        debug!(surface = %self.surface, "Closing headless session");
        self.closed = true;
        self.focused = false;
        self.listener = None;
    }

    fn set_panel_listener(&mut self, listener: Arc<dyn SessionChangeListener>) {
        self.listener = Some(listener);
    }

    fn request_focus(&mut self) {
        self.focused = true;
    }
}

/// Builds headless sessions of a fixed natural size
#[derive(Debug, Clone, Copy)]
pub struct HeadlessFactory {
    size: Size,
}

impl HeadlessFactory {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Size::new(cols, rows),
        }
    }
}

impl SessionFactory for HeadlessFactory {
    type Session = HeadlessSession;
    type Error = SessionError;

    fn create_session(&mut self) -> Result<HeadlessSession> {
        HeadlessSession::new(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::SessionId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Resizes(Mutex<Vec<(Size, RequestOrigin)>>);

    impl SessionChangeListener for Resizes {
        fn on_panel_resize(&self, size: Size, origin: RequestOrigin) {
            self.0.lock().unwrap().push((size, origin));
        }

        fn on_session_changed(&self, _session: SessionId) {}
    }

    #[test]
    fn test_factory_rejects_empty_size() {
        let mut factory = HeadlessFactory::new(0, 24);
        assert!(matches!(
            factory.create_session(),
            Err(SessionError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_resize_reaches_panel_listener() {
        let listener = Arc::new(Resizes::default());
        let mut session = HeadlessFactory::new(80, 24).create_session().unwrap();
        assert!(!session.has_panel_listener());
        session.set_panel_listener(listener.clone());
        assert!(session.has_panel_listener());

        session.resize(Size::new(120, 40), RequestOrigin::Program).unwrap();

        assert_eq!(session.natural_size(), Size::new(120, 40));
        assert_eq!(
            *listener.0.lock().unwrap(),
            vec![(Size::new(120, 40), RequestOrigin::Program)]
        );
    }

    #[test]
    fn test_closed_session_refuses_resize() {
        let mut session = HeadlessSession::new(Size::new(80, 24)).unwrap();
        session.set_panel_listener(Arc::new(Resizes::default()));
        session.request_focus();
        assert!(session.is_focused());

        session.close();
        assert!(session.is_closed());
        assert!(!session.is_focused());
        assert!(!session.has_panel_listener());
        assert!(matches!(
            session.resize(Size::new(10, 10), RequestOrigin::User),
            Err(SessionError::Closed)
        ));
    }
}
