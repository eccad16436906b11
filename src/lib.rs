//! tabterm - tabbed terminal session container
//!
//! A [`TabContainer`](wm::TabContainer) hosts terminal sessions. With one
//! session it shows that session directly; as soon as a second one is
//! created it moves everything behind a tab strip labelled
//! `"Terminal 1"`, `"Terminal 2"`, ... and closing back down to one tab
//! collapses it to the direct view again. A
//! [`SessionChangeListener`](core::SessionChangeListener) hears about every
//! change of the current session.
//!
//! # Modules
//!
//! - **core**: `Session` / `SessionFactory` traits, listener, headless sessions
//! - **wm**: the container state machine, tab strip, events and actor
//! - **ui**: tab bar renderer and tab context menu
//! - **config**: `~/.tabterm/config.toml` and color schemes
//!
//! # Example
//!
//! ```
//! use tabterm::core::HeadlessFactory;
//! use tabterm::wm::{DisplayMode, TabContainer};
//!
//! let mut container = TabContainer::new(HeadlessFactory::new(80, 24));
//! let first = container.create_session()?;
//! assert_eq!(container.mode(), DisplayMode::Single);
//!
//! let second = container.create_session()?;
//! assert_eq!(container.mode(), DisplayMode::Tabbed);
//! assert_eq!(container.current_session_id(), Some(second));
//!
//! container.close(second);
//! assert_eq!(container.current_session_id(), Some(first));
//! # Ok::<(), tabterm::core::SessionError>(())
//! ```

pub mod core;
pub mod wm;
pub mod ui;
pub mod config;

pub use crate::config::Config;
pub use crate::core::{RequestOrigin, Session, SessionChangeListener, SessionFactory, SessionId};
pub use crate::wm::{ContainerEvent, DisplayMode, TabContainer};
