//! Tab context menu.
//!
//! Right-clicking a tab label opens this menu. Its `Close` entry is the only
//! way a session gets closed through the UI.
//!
//! # Example
//!
//! ```ignore
//! let mut menu = ContextMenu::new();
//! menu.show(session_id, click_x, click_y, screen_width, screen_height);
//!
//! menu.down();
//! if let Some(event) = ContainerEvent::from_menu_action(session_id, menu.selected_action()) {
//!     container.handle(event)?;
//! }
//! ```

use unicode_width::UnicodeWidthStr;

use crate::core::session::SessionId;

/// Actions offered on a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuAction {
    /// Open another session in a new tab
    NewSession,
    /// Close the session behind the tab
    Close,
    /// Dismiss the menu
    Cancel,
}

/// A single item in the context menu.
#[derive(Debug, Clone)]
pub struct MenuItem {
    /// Display label for the menu item.
    pub label: &'static str,
    /// Action to execute when selected.
    pub action: ContextMenuAction,
    /// Optional keyboard shortcut hint.
    pub shortcut: Option<&'static str>,
}

impl MenuItem {
    pub const fn new(label: &'static str, action: ContextMenuAction, shortcut: Option<&'static str>) -> Self {
        Self { label, action, shortcut }
    }

    /// " label (x)" as drawn inside the borders
    pub fn display_text(&self) -> String {
        let shortcut = self.shortcut.map(|s| format!(" ({})", s)).unwrap_or_default();
        format!(" {}{}", self.label, shortcut)
    }
}

/// Context menu state and behavior.
pub struct ContextMenu {
    /// Whether the menu is currently visible.
    pub visible: bool,
    /// Session whose tab the menu was opened on.
    pub target_session: Option<SessionId>,
    /// X position of the menu (screen coordinates).
    pub x: u16,
    /// Y position of the menu (screen coordinates).
    pub y: u16,
    /// Index of the currently highlighted item.
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextMenu {
    pub fn new() -> Self {
        Self {
            visible: false,
            target_session: None,
            x: 0,
            y: 0,
            selected: 0,
            items: vec![
                MenuItem::new("New Session", ContextMenuAction::NewSession, Some("c")),
                MenuItem::new("Close", ContextMenuAction::Close, Some("x")),
                MenuItem::new("Cancel", ContextMenuAction::Cancel, Some("Esc")),
            ],
        }
    }

    /// Show the menu for `session`'s tab, clamped so it stays on screen
    pub fn show(&mut self, session: SessionId, x: u16, y: u16, screen_width: u16, screen_height: u16) {
        self.visible = true;
        self.target_session = Some(session);
        self.selected = 0;

        let (width, height) = self.dimensions();
        self.x = x.min(screen_width.saturating_sub(width));
        self.y = y.min(screen_height.saturating_sub(height));
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.target_session = None;
    }

    /// Move selection up (wraps)
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    /// Move selection down (wraps)
    pub fn down(&mut self) {
        if self.selected < self.items.len() - 1 {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
    }

    /// Highlight the item bound to `shortcut`, if any
    pub fn select_shortcut(&mut self, shortcut: &str) -> Option<ContextMenuAction> {
        let index = self.items.iter().position(|item| item.shortcut == Some(shortcut))?;
        self.selected = index;
        Some(self.selected_action())
    }

    pub fn selected_action(&self) -> ContextMenuAction {
        self.items[self.selected].action
    }

    /// Menu content width in columns (excluding borders)
    pub fn content_width(&self) -> u16 {
        self.items
            .iter()
            .map(|item| item.display_text().width() + 1)
            .max()
            .unwrap_or(18) as u16
    }

    /// Menu dimensions (including borders)
    pub fn dimensions(&self) -> (u16, u16) {
        let width = self.content_width() + 2;
        let height = self.items.len() as u16 + 2;
        (width, height)
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        let (width, height) = self.dimensions();
        col >= self.x && col < self.x + width && row >= self.y && row < self.y + height
    }

    /// Item row under (col, row), ignoring borders
    fn item_at(&self, col: u16, row: u16) -> Option<usize> {
        if !self.contains(col, row) {
            return None;
        }
        let relative_row = row.checked_sub(self.y + 1)?;
        let index = relative_row as usize;
        (index < self.items.len()).then_some(index)
    }

    /// Handle a click, returns the action if an item was hit
    pub fn handle_click(&mut self, col: u16, row: u16) -> Option<ContextMenuAction> {
        let index = self.item_at(col, row)?;
        self.selected = index;
        Some(self.selected_action())
    }

    /// Follow the mouse; returns true if the highlight moved
    pub fn update_hover(&mut self, col: u16, row: u16) -> bool {
        match self.item_at(col, row) {
            Some(index) if index != self.selected => {
                self.selected = index;
                true
            }
            _ => false,
        }
    }
}
