//! Autonomous sequencing: timed actions, routines, and the match catalog.

pub mod routines;
pub mod sequencer;
