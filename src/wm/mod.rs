//! Window management - the tab container and its plumbing.
//!
//! - **container**: `TabContainer`, the Empty/Single/Tabbed state machine
//! - **tab**: `TabStrip` (ordered tabs + selection) and `Tab`
//! - **event**: `ContainerEvent` messages from the UI
//! - **actor**: `ContainerActor`, a thread that owns a container
//!
//! # Module Hierarchy
//!
//! ```text
//! wm/
//! ├── mod.rs        - Module exports
//! ├── container.rs  - TabContainer (single view or tab strip)
//! ├── tab.rs        - TabStrip / Tab
//! ├── event.rs      - ContainerEvent
//! └── actor.rs      - ContainerActor / ContainerHandle
//! ```

pub mod tab;
pub mod event;
pub mod container;
pub mod actor;

pub use tab::{Tab, TabInfo, TabStrip};
pub use event::ContainerEvent;
pub use container::{DisplayContent, DisplayMode, TabContainer, TabNaming};
pub use actor::{ActorError, ContainerActor, ContainerHandle, ContainerSnapshot};
