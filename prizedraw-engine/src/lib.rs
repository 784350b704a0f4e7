//! Draw engine for the prize draw toolkit
//!
//! Picks unique winners from the eligible pool, hands out prizes round-robin
//! and keeps the session bookkeeping (eligible pool, winners history) that
//! stops anyone from winning twice.

pub mod animation;
pub mod controller;
pub mod engine;
pub mod error;
pub mod session;

pub use animation::{spawn_shuffle, ShuffleDeck, ShuffleFrame, ShuffleHandle};
pub use controller::DrawController;
pub use engine::{check_preconditions, execute_draw, DrawOutcome};
pub use error::{DrawError, Result};
pub use session::{DrawPhase, DrawSession, DrawTicket, DEFAULT_WINNER_COUNT};
