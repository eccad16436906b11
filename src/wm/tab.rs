//! Tab strip - an ordered row of labelled sessions with one selected tab

use crate::core::session::SessionId;

/// Display snapshot of one tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: SessionId,
    pub label: String,
    pub selected: bool,
}

/// A labelled session shown in the tab strip
pub struct Tab<S> {
    /// Container-assigned session identifier
    pub id: SessionId,
    /// Tab label ("Terminal 3")
    pub label: String,
    /// The hosted session
    pub session: S,
}

impl<S> Tab<S> {
    pub fn new(id: SessionId, label: String, session: S) -> Self {
        Self { id, label, session }
    }
}

/// Ordered tabs plus the selected index.
///
/// Mutations report whether the selected session changed so the owner can
/// turn that into a session-change notification.
pub struct TabStrip<S> {
    tabs: Vec<Tab<S>>,
    selected: Option<usize>,
}

impl<S> Default for TabStrip<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TabStrip<S> {
    /// Create an empty strip with nothing selected
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Append a tab at the end.
    ///
    /// The first tab of an empty strip becomes selected; returns `true` when
    /// that happens.
    pub fn push(&mut self, tab: Tab<S>) -> bool {
        self.tabs.push(tab);
        if self.selected.is_none() {
            self.selected = Some(0);
            return true;
        }
        false
    }

    /// Select the tab at `index`; returns `true` if the selection changed
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || self.selected == Some(index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Raw selected index; may be stale, use [`TabStrip::get`] to resolve it
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected tab, if the selected index is in range
    pub fn selected(&self) -> Option<&Tab<S>> {
        self.selected.and_then(|i| self.get(i))
    }

    pub fn get(&self, index: usize) -> Option<&Tab<S>> {
        self.tabs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tab<S>> {
        self.tabs.get_mut(index)
    }

    pub fn position(&self, id: SessionId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab<S>> {
        self.tabs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tab<S>> {
        self.tabs.iter_mut()
    }

    /// Remove the tab at `index`.
    ///
    /// When the selected tab goes away its neighbour takes over: the tab now
    /// at the same index, or the previous one if the last tab was removed.
    /// Returns the removed tab and whether the selected session changed.
    pub fn remove(&mut self, index: usize) -> Option<(Tab<S>, bool)> {
        if index >= self.tabs.len() {
            return None;
        }
        let before = self.selected().map(|t| t.id);
        let tab = self.tabs.remove(index);

        self.selected = match self.selected {
            _ if self.tabs.is_empty() => None,
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) if sel == index => Some(sel.min(self.tabs.len() - 1)),
            other => other,
        };

        let after = self.selected().map(|t| t.id);
        Some((tab, before != after))
    }

    /// Take every tab out of the strip, leaving it empty
    pub fn drain(&mut self) -> Vec<Tab<S>> {
        self.selected = None;
        std::mem::take(&mut self.tabs)
    }
}
