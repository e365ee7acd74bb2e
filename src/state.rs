//! State machine module root.
//!
//! One state machine per mechanism plus the superstructure machine that
//! coordinates them. Every machine holds exactly one current state; requests
//! are always accepted and stored, and safety is enforced by clamping inside
//! `update`, never by refusing requests.

pub mod climber;
pub mod diverter;
pub mod pivot;
pub mod shooter;
pub mod superstructure;
pub mod trigger_intake;
