//! Tab container - shows one session directly or several behind a tab strip
//!
//! ```text
//! Empty ──create──> Single ──create──> Tabbed ──create──> Tabbed
//!                     ^                  │
//!                     └──close (2 tabs)──┘   close (>2 tabs) stays Tabbed
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::listener::{RequestOrigin, SessionChangeListener};
use crate::core::session::{Session, SessionFactory, SessionId, Size, SurfaceHandle};
use super::event::ContainerEvent;
use super::tab::{Tab, TabInfo, TabStrip};

/// How the container presents its sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// No session created yet
    Empty,
    /// One session shown directly
    Single,
    /// Sessions behind a tab strip
    Tabbed,
}

/// What the container currently shows as its content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayContent {
    Empty,
    Session(SurfaceHandle),
    TabStrip,
}

/// Tab label policy: `"{prefix} {n}"` with n counting from `first_number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabNaming {
    pub prefix: String,
    pub first_number: u32,
}

impl Default for TabNaming {
    fn default() -> Self {
        Self {
            prefix: "Terminal".to_string(),
            first_number: 1,
        }
    }
}

impl TabNaming {
    pub fn label(&self, number: u32) -> String {
        format!("{} {}", self.prefix, number)
    }
}

enum DisplayState<S> {
    Empty,
    Single { id: SessionId, session: S },
    Tabbed(TabStrip<S>),
}

impl<S> DisplayState<S> {
    fn mode(&self) -> DisplayMode {
        match self {
            DisplayState::Empty => DisplayMode::Empty,
            DisplayState::Single { .. } => DisplayMode::Single,
            DisplayState::Tabbed(_) => DisplayMode::Tabbed,
        }
    }
}

/// Owns the sessions and keeps track of the current one.
///
/// Every mutation takes `&mut self`, and listener callbacks run while that
/// borrow is held, so a callback can never start another transition on the
/// same container.
pub struct TabContainer<F: SessionFactory> {
    factory: F,
    state: DisplayState<F::Session>,
    naming: TabNaming,
    /// Number for the next tab label
    tab_counter: u32,
    next_session_id: SessionId,
    listener: Option<Arc<dyn SessionChangeListener>>,
    surface: SurfaceHandle,
    size: Size,
}

impl<F: SessionFactory> TabContainer<F> {
    /// Create an empty container with the default "Terminal N" labels
    pub fn new(factory: F) -> Self {
        Self::with_naming(factory, TabNaming::default())
    }

    pub fn with_naming(factory: F, naming: TabNaming) -> Self {
        let first_number = naming.first_number;
        Self {
            factory,
            state: DisplayState::Empty,
            naming,
            tab_counter: first_number,
            next_session_id: 1,
            listener: None,
            surface: SurfaceHandle::allocate(),
            size: Size::default(),
        }
    }

    /// Create a session and place it.
    ///
    /// The first session is shown directly. Any further session switches the
    /// container to tabs (if not already) and is appended as the selected
    /// tab. Factory errors are returned as-is and leave the container
    /// untouched.
    pub fn create_session(&mut self) -> Result<SessionId, F::Error> {
        let mut session = self.factory.create_session()?;
        let id = self.next_session_id;
        self.next_session_id += 1;

        if let Some(listener) = &self.listener {
            session.set_panel_listener(Arc::clone(listener));
        }

        match std::mem::replace(&mut self.state, DisplayState::Empty) {
            DisplayState::Empty => {
                let size = session.natural_size();
                self.size = size;
                self.state = DisplayState::Single { id, session };
                info!(session = id, %size, "Showing first session directly");

                if let Some(listener) = &self.listener {
                    listener.on_panel_resize(size, RequestOrigin::User);
                }
                self.emit_session_changed(id);
            }
            DisplayState::Single { id: single_id, session: single } => {
                debug!(session = single_id, "Switching to tabbed display");
                self.tab_counter = self.naming.first_number;

                let mut strip = TabStrip::new();
                let label = self.next_label();
                if strip.push(Tab::new(single_id, label, single)) {
                    self.emit_session_changed(single_id);
                }
                self.append_tab(&mut strip, id, session);
                self.state = DisplayState::Tabbed(strip);
            }
            DisplayState::Tabbed(mut strip) => {
                self.append_tab(&mut strip, id, session);
                self.state = DisplayState::Tabbed(strip);
            }
        }

        Ok(id)
    }

    fn append_tab(&mut self, strip: &mut TabStrip<F::Session>, id: SessionId, session: F::Session) {
        let label = self.next_label();
        info!(session = id, label = %label, "Adding tab");
        let first = strip.push(Tab::new(id, label, session));
        let selected = strip.select(strip.len() - 1);
        if first || selected {
            self.emit_session_changed(id);
        }
    }

    fn next_label(&mut self) -> String {
        let label = self.naming.label(self.tab_counter);
        self.tab_counter += 1;
        label
    }

    fn emit_session_changed(&self, id: SessionId) {
        if let Some(listener) = &self.listener {
            listener.on_session_changed(id);
        }
    }

    /// The current session: the selected tab's, or the single one
    pub fn current_session(&self) -> Option<&F::Session> {
        match &self.state {
            DisplayState::Empty => None,
            DisplayState::Single { session, .. } => Some(session),
            DisplayState::Tabbed(strip) => strip.selected().map(|t| &t.session),
        }
    }

    pub fn current_session_id(&self) -> Option<SessionId> {
        match &self.state {
            DisplayState::Empty => None,
            DisplayState::Single { id, .. } => Some(*id),
            DisplayState::Tabbed(strip) => strip.selected().map(|t| t.id),
        }
    }

    /// Replace the listener.
    ///
    /// In tabbed mode every hosted session gets it as its panel listener.
    /// Registration alone never fires `on_session_changed`.
    pub fn set_session_change_listener(&mut self, listener: Arc<dyn SessionChangeListener>) {
        if let DisplayState::Tabbed(strip) = &mut self.state {
            for tab in strip.iter_mut() {
                tab.session.set_panel_listener(Arc::clone(&listener));
            }
        }
        self.listener = Some(listener);
    }

    /// Select a tab (tab strip click). No-op outside tabbed mode, for an
    /// out-of-range index, or for the already selected tab.
    pub fn select_tab(&mut self, index: usize) {
        let changed = match &mut self.state {
            DisplayState::Tabbed(strip) => {
                if strip.select(index) {
                    strip.get(index).map(|t| t.id)
                } else {
                    None
                }
            }
            _ => None,
        };
        if let Some(id) = changed {
            debug!(session = id, index, "Tab selected");
            self.emit_session_changed(id);
        }
    }

    /// Close a tabbed session.
    ///
    /// The session is closed, then its tab removed. With two tabs the
    /// container collapses back to showing the remaining session directly.
    ///
    /// # Panics
    ///
    /// If the container is not tabbed or `id` is not in any tab. The close
    /// action only exists on tabs, so reaching this is a caller bug.
    pub fn close(&mut self, id: SessionId) {
        let mut strip = match std::mem::replace(&mut self.state, DisplayState::Empty) {
            DisplayState::Tabbed(strip) => strip,
            other => {
                let mode = other.mode();
                self.state = other;
                panic!("close({}) requires a tabbed container, mode is {:?}", id, mode);
            }
        };

        let Some(index) = strip.position(id) else {
            self.state = DisplayState::Tabbed(strip);
            panic!("close({}): session is not in any tab", id);
        };

        if let Some(tab) = strip.get_mut(index) {
            tab.session.close();
        }

        if strip.len() == 2 {
            let survivor = strip.drain().into_iter().find(|t| t.id != id);
            if let Some(Tab { id: survivor_id, mut session, .. }) = survivor {
                info!(closed = id, session = survivor_id, "Collapsing to single session");
                session.request_focus();
                self.state = DisplayState::Single { id: survivor_id, session };
                self.emit_session_changed(survivor_id);
            }
            return;
        }

        let selection = match strip.remove(index) {
            Some((_, true)) => strip.selected().map(|t| t.id),
            _ => None,
        };
        debug!(closed = id, remaining = strip.len(), "Tab removed");
        self.state = DisplayState::Tabbed(strip);
        if let Some(selected) = selection {
            self.emit_session_changed(selected);
        }
    }

    /// Apply a UI event.
    ///
    /// Returns the new session's id for [`ContainerEvent::CreateSession`].
    pub fn handle(&mut self, event: ContainerEvent) -> Result<Option<SessionId>, F::Error> {
        debug!(?event, "Handling container event");
        match event {
            ContainerEvent::CreateSession => return self.create_session().map(Some),
            ContainerEvent::SelectTab(index) => self.select_tab(index),
            ContainerEvent::CloseTab(id) => self.close(id),
        }
        Ok(None)
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode()
    }

    pub fn content(&self) -> DisplayContent {
        match &self.state {
            DisplayState::Empty => DisplayContent::Empty,
            DisplayState::Single { session, .. } => DisplayContent::Session(session.display_surface()),
            DisplayState::Tabbed(_) => DisplayContent::TabStrip,
        }
    }

    /// The container's own visual root
    pub fn display_handle(&self) -> SurfaceHandle {
        self.surface
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// There is no tab limit
    pub fn can_open_session(&self) -> bool {
        true
    }

    pub fn tab_count(&self) -> usize {
        match &self.state {
            DisplayState::Tabbed(strip) => strip.len(),
            _ => 0,
        }
    }

    /// Snapshot of the tab strip for rendering; empty unless tabbed
    pub fn tabs(&self) -> Vec<TabInfo> {
        match &self.state {
            DisplayState::Tabbed(strip) => {
                let selected = strip.selected_index();
                strip
                    .iter()
                    .enumerate()
                    .map(|(i, t)| TabInfo {
                        id: t.id,
                        label: t.label.clone(),
                        selected: selected == Some(i),
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn session(&self, id: SessionId) -> Option<&F::Session> {
        match &self.state {
            DisplayState::Empty => None,
            DisplayState::Single { id: single, session } => (*single == id).then_some(session),
            DisplayState::Tabbed(strip) => strip.iter().find(|t| t.id == id).map(|t| &t.session),
        }
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut F::Session> {
        match &mut self.state {
            DisplayState::Empty => None,
            DisplayState::Single { id: single, session } => (*single == id).then_some(session),
            DisplayState::Tabbed(strip) => strip.iter_mut().find(|t| t.id == id).map(|t| &mut t.session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        closes: AtomicUsize,
        listener_sets: AtomicUsize,
        focus_requests: AtomicUsize,
    }

    struct FakeSession {
        surface: SurfaceHandle,
        probe: Arc<Probe>,
    }

    impl Session for FakeSession {
        fn display_surface(&self) -> SurfaceHandle {
            self.surface
        }

        fn natural_size(&self) -> Size {
            Size::new(100, 30)
        }

        fn close(&mut self) {
            self.probe.closes.fetch_add(1, Ordering::SeqCst);
        }

        fn set_panel_listener(&mut self, _listener: Arc<dyn SessionChangeListener>) {
            self.probe.listener_sets.fetch_add(1, Ordering::SeqCst);
        }

        fn request_focus(&mut self) {
            self.probe.focus_requests.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default, Clone)]
    struct FakeFactory {
        probes: Arc<Mutex<Vec<Arc<Probe>>>>,
        fail_next: Arc<Mutex<bool>>,
    }

    impl FakeFactory {
        /// Probe of the n-th created session (session ids start at 1)
        fn probe(&self, id: SessionId) -> Arc<Probe> {
            Arc::clone(&self.probes.lock().unwrap()[id as usize - 1])
        }
    }

    impl SessionFactory for FakeFactory {
        type Session = FakeSession;
        type Error = String;

        fn create_session(&mut self) -> Result<FakeSession, String> {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err("factory down".to_string());
            }
            let probe = Arc::new(Probe::default());
            self.probes.lock().unwrap().push(Arc::clone(&probe));
            Ok(FakeSession {
                surface: SurfaceHandle::allocate(),
                probe,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Note {
        Resize(Size, RequestOrigin),
        Changed(SessionId),
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Note>>);

    impl Recorder {
        fn take(&self) -> Vec<Note> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    impl SessionChangeListener for Recorder {
        fn on_panel_resize(&self, size: Size, origin: RequestOrigin) {
            self.0.lock().unwrap().push(Note::Resize(size, origin));
        }

        fn on_session_changed(&self, session: SessionId) {
            self.0.lock().unwrap().push(Note::Changed(session));
        }
    }

    fn setup() -> (TabContainer<FakeFactory>, FakeFactory, Arc<Recorder>) {
        let factory = FakeFactory::default();
        let recorder = Arc::new(Recorder::default());
        let mut container = TabContainer::new(factory.clone());
        container.set_session_change_listener(recorder.clone());
        (container, factory, recorder)
    }

    fn labels(container: &TabContainer<FakeFactory>) -> Vec<String> {
        container.tabs().into_iter().map(|t| t.label).collect()
    }

    #[test]
    fn test_empty_container() {
        let container = TabContainer::new(FakeFactory::default());
        assert_eq!(container.mode(), DisplayMode::Empty);
        assert_eq!(container.content(), DisplayContent::Empty);
        assert!(container.current_session().is_none());
        assert!(container.can_open_session());
        assert!(container.tabs().is_empty());
    }

    #[test]
    fn test_first_session_is_shown_directly() {
        let (mut container, factory, recorder) = setup();

        let id = container.create_session().unwrap();

        assert_eq!(container.mode(), DisplayMode::Single);
        assert_eq!(container.current_session_id(), Some(id));
        let surface = container.current_session().unwrap().display_surface();
        assert_eq!(container.content(), DisplayContent::Session(surface));
        assert_eq!(container.size(), Size::new(100, 30));
        assert_eq!(container.tab_count(), 0);
        assert_eq!(factory.probe(id).listener_sets.load(Ordering::SeqCst), 1);
        assert_eq!(
            recorder.take(),
            vec![
                Note::Resize(Size::new(100, 30), RequestOrigin::User),
                Note::Changed(id),
            ]
        );
    }

    #[test]
    fn test_second_session_switches_to_tabs() {
        let (mut container, _factory, recorder) = setup();
        let first = container.create_session().unwrap();
        recorder.take();

        let second = container.create_session().unwrap();

        assert_eq!(container.mode(), DisplayMode::Tabbed);
        assert_eq!(container.content(), DisplayContent::TabStrip);
        assert_eq!(labels(&container), vec!["Terminal 1", "Terminal 2"]);
        assert_eq!(container.current_session_id(), Some(second));
        // Moving the first session in selects it, then the new tab is selected
        assert_eq!(recorder.take(), vec![Note::Changed(first), Note::Changed(second)]);
    }

    #[test]
    fn test_labels_are_not_renumbered_on_close() {
        let (mut container, _factory, _recorder) = setup();
        let ids: Vec<_> = (0..4).map(|_| container.create_session().unwrap()).collect();
        assert_eq!(
            labels(&container),
            vec!["Terminal 1", "Terminal 2", "Terminal 3", "Terminal 4"]
        );

        container.close(ids[1]);
        let id = container.create_session().unwrap();

        assert_eq!(
            labels(&container),
            vec!["Terminal 1", "Terminal 3", "Terminal 4", "Terminal 5"]
        );
        assert_eq!(container.current_session_id(), Some(id));
    }

    #[test]
    fn test_close_with_two_tabs_collapses_to_other_session() {
        let (mut container, factory, recorder) = setup();
        let first = container.create_session().unwrap();
        let second = container.create_session().unwrap();
        recorder.take();

        // Closing the first tab must keep the second, not whatever sits at index 0
        container.close(first);

        assert_eq!(container.mode(), DisplayMode::Single);
        assert_eq!(container.current_session_id(), Some(second));
        assert_eq!(container.tab_count(), 0);
        let surface = container.current_session().unwrap().display_surface();
        assert_eq!(container.content(), DisplayContent::Session(surface));
        assert_eq!(recorder.take(), vec![Note::Changed(second)]);
        assert_eq!(factory.probe(first).closes.load(Ordering::SeqCst), 1);
        assert_eq!(factory.probe(second).closes.load(Ordering::SeqCst), 0);
        assert_eq!(factory.probe(second).focus_requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_second_of_two_keeps_first() {
        let (mut container, _factory, recorder) = setup();
        let first = container.create_session().unwrap();
        let second = container.create_session().unwrap();
        recorder.take();

        container.close(second);

        assert_eq!(container.current_session_id(), Some(first));
        assert_eq!(recorder.take(), vec![Note::Changed(first)]);
    }

    #[test]
    fn test_close_with_three_tabs_stays_tabbed() {
        let (mut container, factory, recorder) = setup();
        let ids: Vec<_> = (0..3).map(|_| container.create_session().unwrap()).collect();
        recorder.take();

        // The last tab is selected; closing it selects its left neighbour
        container.close(ids[2]);

        assert_eq!(container.mode(), DisplayMode::Tabbed);
        assert_eq!(container.tab_count(), 2);
        assert_eq!(container.current_session_id(), Some(ids[1]));
        assert_eq!(recorder.take(), vec![Note::Changed(ids[1])]);
        assert_eq!(factory.probe(ids[2]).closes.load(Ordering::SeqCst), 1);
        assert!(container.session(ids[2]).is_none());
    }

    #[test]
    fn test_close_unselected_tab_keeps_current() {
        let (mut container, _factory, recorder) = setup();
        let ids: Vec<_> = (0..3).map(|_| container.create_session().unwrap()).collect();
        recorder.take();

        container.close(ids[0]);

        assert_eq!(container.tab_count(), 2);
        assert_eq!(container.current_session_id(), Some(ids[2]));
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_retabbing_resets_counter() {
        let (mut container, _factory, _recorder) = setup();
        let first = container.create_session().unwrap();
        container.create_session().unwrap();
        container.create_session().unwrap();
        container.close(first);
        let ids: Vec<_> = container.tabs().iter().map(|t| t.id).collect();
        container.close(ids[0]);
        assert_eq!(container.mode(), DisplayMode::Single);

        container.create_session().unwrap();

        assert_eq!(labels(&container), vec!["Terminal 1", "Terminal 2"]);
    }

    #[test]
    fn test_listener_propagates_to_tabbed_sessions_once() {
        let factory = FakeFactory::default();
        let mut container = TabContainer::new(factory.clone());
        let a = container.create_session().unwrap();
        let b = container.create_session().unwrap();

        let recorder = Arc::new(Recorder::default());
        container.set_session_change_listener(recorder.clone());
        assert_eq!(factory.probe(a).listener_sets.load(Ordering::SeqCst), 1);
        assert_eq!(factory.probe(b).listener_sets.load(Ordering::SeqCst), 1);
        assert!(recorder.take().is_empty());

        let c = container.create_session().unwrap();

        assert_eq!(factory.probe(c).listener_sets.load(Ordering::SeqCst), 1);
        assert_eq!(factory.probe(a).listener_sets.load(Ordering::SeqCst), 1);
        assert_eq!(factory.probe(b).listener_sets.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.take(), vec![Note::Changed(c)]);
    }

    #[test]
    fn test_listener_registration_in_single_mode_is_silent() {
        let factory = FakeFactory::default();
        let mut container = TabContainer::new(factory.clone());
        let id = container.create_session().unwrap();

        let recorder = Arc::new(Recorder::default());
        container.set_session_change_listener(recorder.clone());

        assert!(recorder.take().is_empty());
        assert_eq!(factory.probe(id).listener_sets.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_select_tab_notifies_on_change_only() {
        let (mut container, _factory, recorder) = setup();
        let first = container.create_session().unwrap();
        let second = container.create_session().unwrap();
        recorder.take();

        container.select_tab(0);
        container.select_tab(0);
        container.select_tab(7);

        assert_eq!(container.current_session_id(), Some(first));
        assert_eq!(recorder.take(), vec![Note::Changed(first)]);

        container.select_tab(1);
        assert_eq!(recorder.take(), vec![Note::Changed(second)]);
    }

    #[test]
    fn test_select_tab_in_single_mode_is_noop() {
        let (mut container, _factory, recorder) = setup();
        let id = container.create_session().unwrap();
        recorder.take();

        container.select_tab(0);

        assert_eq!(container.current_session_id(), Some(id));
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_factory_error_propagates_unchanged() {
        let (mut container, factory, recorder) = setup();
        let id = container.create_session().unwrap();
        recorder.take();

        *factory.fail_next.lock().unwrap() = true;
        let err = container.create_session().unwrap_err();

        assert_eq!(err, "factory down");
        assert_eq!(container.mode(), DisplayMode::Single);
        assert_eq!(container.current_session_id(), Some(id));
        assert!(recorder.take().is_empty());
    }

    #[test]
    #[should_panic(expected = "requires a tabbed container")]
    fn test_close_in_single_mode_panics() {
        let (mut container, _factory, _recorder) = setup();
        let id = container.create_session().unwrap();
        container.close(id);
    }

    #[test]
    #[should_panic(expected = "not in any tab")]
    fn test_close_unknown_session_panics() {
        let (mut container, _factory, _recorder) = setup();
        container.create_session().unwrap();
        container.create_session().unwrap();
        container.close(42);
    }

    #[test]
    fn test_events_drive_transitions() {
        let (mut container, _factory, _recorder) = setup();
        let first = container.handle(ContainerEvent::CreateSession).unwrap();
        let second = container.handle(ContainerEvent::CreateSession).unwrap();
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));

        assert_eq!(container.handle(ContainerEvent::SelectTab(0)).unwrap(), None);
        assert_eq!(container.current_session_id(), Some(1));

        container.handle(ContainerEvent::CloseTab(1)).unwrap();
        assert_eq!(container.mode(), DisplayMode::Single);
        assert_eq!(container.current_session_id(), Some(2));
    }

    #[test]
    fn test_custom_naming() {
        let naming = TabNaming {
            prefix: "Shell".to_string(),
            first_number: 0,
        };
        let mut container = TabContainer::with_naming(FakeFactory::default(), naming);
        container.create_session().unwrap();
        container.create_session().unwrap();

        assert_eq!(labels(&container), vec!["Shell 0", "Shell 1"]);
    }

    #[test]
    fn test_display_handle_is_stable() {
        let (mut container, _factory, _recorder) = setup();
        let root = container.display_handle();
        container.create_session().unwrap();
        container.create_session().unwrap();
        assert_eq!(container.display_handle(), root);
    }

    #[test]
    fn test_closure_factory() {
        let mut container = TabContainer::new(|| -> Result<FakeSession, String> {
            Ok(FakeSession {
                surface: SurfaceHandle::allocate(),
                probe: Arc::new(Probe::default()),
            })
        });
        let id = container.create_session().unwrap();
        assert!(container.session(id).is_some());
        assert!(container.session_mut(id).is_some());
        assert!(container.session(id + 1).is_none());
    }
}
