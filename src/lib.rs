//! Console for a versioned object store.
//!
//! The library holds the session, the bucket catalog, the selected bucket's
//! version history and the action dispatcher; the `verso` binary puts a CLI
//! and a terminal UI on top, and `verso-server` is a reference storage
//! service speaking the same HTTP contract.

pub mod api;
pub mod catalog;
pub mod confirm;
pub mod console;
pub mod dispatcher;
pub mod history;
pub mod logging;
pub mod model;
pub mod projector;
pub mod session;
pub mod store;
pub mod time_utils;
pub mod tui;
mod tui_shell;

pub use api::{ApiClient, ApiError, Route};
pub use console::{Console, LoginError};
pub use dispatcher::{ActionOutcome, ActionPhase, Effect, Intent, PendingAction, Step};
pub use projector::{Row, ViewMode};
pub use session::SessionStore;
