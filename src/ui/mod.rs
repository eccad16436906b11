//! Tab chrome: the tab bar and the per-tab context menu.
//!
//! - **tab_bar**: renders the tab strip and maps clicks to tab indices
//! - **context_menu**: right-click menu on a tab (Close, New Session)
//!
//! Session content is never drawn here.

pub mod context_menu;
pub mod tab_bar;

pub use context_menu::{ContextMenu, ContextMenuAction};
pub use tab_bar::TabBarRenderer;
