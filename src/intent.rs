//! Intent module root.
//!
//! Translation from raw operator/automation inputs into one requested
//! superstructure state and drive mode per cycle, plus the game-piece
//! location tracking that gates the aiming automation.

pub mod note_tracker;
pub mod resolver;
