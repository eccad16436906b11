//! Session change notifications

use std::fmt;

use super::session::{SessionId, Size};

/// Who asked for a panel change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// The embedding application or the user (window resize, first session)
    User,
    /// The program running inside a session (escape sequence)
    Program,
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestOrigin::User => write!(f, "user"),
            RequestOrigin::Program => write!(f, "program"),
        }
    }
}

/// Receives panel events from sessions and current-session changes from the
/// container.
///
/// The same listener serves two channels: every session gets it as its panel
/// listener, and the container calls `on_session_changed` whenever the
/// current session changes.
pub trait SessionChangeListener: Send + Sync {
    fn on_panel_resize(&self, size: Size, origin: RequestOrigin);

    fn on_session_changed(&self, session: SessionId);
}
