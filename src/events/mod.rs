//! Typed notifications for observers and UI hooks.
//!
//! ## Key Components
//!
//! - [`ArenaEvent`]: Closed set of things that can happen in a session
//! - [`NotificationSink`]: Injected observer (closures qualify)
//! - [`Notifier`]: Optional sink handle; publishing never fails
//! - [`EventLog`]: Recording sink with a shared handle
//! - [`TracingSink`]: Forwards events to `tracing`
//!
//! ## Example Usage
//!
//! ```
//! use rps_arena::core::{ArenaConfig, PieceKind, PlayerId};
//! use rps_arena::events::{ArenaEvent, EventLog};
//! use rps_arena::session::Session;
//!
//! let log = EventLog::new();
//! let mut session = Session::new(ArenaConfig::new()).with_sink(log.clone());
//!
//! session.initialize();
//! session.place_piece(1, 1, PieceKind::Rock, PlayerId::new(1)).unwrap();
//!
//! assert_eq!(log.named("piece_placed").len(), 1);
//! assert_eq!(log.events()[1], ArenaEvent::Initialized);
//! ```

mod event;
mod sink;

pub use event::ArenaEvent;
pub use sink::{EventLog, NotificationSink, Notifier, TracingSink};
