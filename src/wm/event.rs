//! Container events
//!
//! Tab strip clicks and context menu actions are turned into these messages
//! and fed to [`TabContainer::handle`](super::TabContainer::handle), so the
//! state machine never sees toolkit types.

use crate::core::session::SessionId;
use crate::ui::context_menu::ContextMenuAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerEvent {
    /// Open another session
    CreateSession,
    /// The tab at this index was clicked
    SelectTab(usize),
    /// "Close" was chosen on this session's tab
    CloseTab(SessionId),
}

impl ContainerEvent {
    /// Map a context menu choice on `session`'s tab to an event
    pub fn from_menu_action(session: SessionId, action: ContextMenuAction) -> Option<Self> {
        match action {
            ContextMenuAction::Close => Some(ContainerEvent::CloseTab(session)),
            ContextMenuAction::NewSession => Some(ContainerEvent::CreateSession),
            ContextMenuAction::Cancel => None,
        }
    }
}
