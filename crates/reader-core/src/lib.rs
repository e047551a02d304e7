//! # Read-along synchronization core
//!
//! Keeps a visual highlight (current word, current sentence) in step with an
//! externally-driven audio narration of a text document, and lets the user
//! pause, resume, restart with different playback parameters, or stop,
//! all without losing position.
//!
//! The pieces, leaves first:
//!
//! - [`position`]: maps the engine's slice-relative progress offsets back to
//!   word indices in the session's segmentation.
//! - [`termination`]: decides whether a completion signal is genuine, an
//!   intentional stop, or a cancel artifact to ignore.
//! - [`controller`]: the [`ReaderSession`] state machine that owns the
//!   segmentation snapshot and mediates every transition.
//! - [`frame`]: the [`HighlightFrame`] snapshot a rendering layer consumes.
//!
//! Everything is single-threaded and event-driven: the host calls the
//! transition methods on user actions and pumps [`EngineEvent`]s from the
//! narration engine into [`ReaderSession::handle_event`]. Nothing blocks and
//! nothing errors outward; bad input and engine anomalies degrade to
//! "nothing highlighted", never to an exception surfaced at the UI.
//!
//! [`EngineEvent`]: aloud_narrator_interface::EngineEvent

pub mod controller;
pub mod frame;
pub mod params;
pub mod position;
pub mod termination;

pub use controller::ReaderSession;
pub use frame::{HighlightFrame, PlaybackState};
pub use params::{MAX_RATE, MIN_RATE, PlaybackParams};
pub use termination::{CompletionVerdict, TerminationPolicy};
