//! Session-side building blocks.
//!
//! - **session**: the `Session` / `SessionFactory` traits the container talks to
//! - **listener**: `SessionChangeListener` and `RequestOrigin`
//! - **headless**: a session with no emulator behind it
//!
//! # Architecture
//!
//! ```text
//! SessionFactory ──creates──> Session
//!                               ├── display surface + natural size
//!                               ├── close()
//!                               └── panel listener ──> SessionChangeListener
//! ```

pub mod session;
pub mod listener;
pub mod headless;

pub use session::{Session, SessionFactory, SessionId, Size, SurfaceHandle};
pub use listener::{RequestOrigin, SessionChangeListener};
pub use headless::{HeadlessFactory, HeadlessSession, SessionError};
