//! Superstructure coordination layer for the Kestrel robot.
//!
//! Coordinates five mechanisms (shooter, pivot, trigger intake, climber,
//! diverter) under one high-level state machine, with safety interlocks
//! evaluated from live sensor readings, operator intent resolution with
//! sticky modes and manual jog latches, and a timed autonomous sequencer.
//!
//! The crate is deliberately hardware-free: sensors arrive as a
//! [`hw::SensorSnapshot`] per cycle, setpoints leave as a
//! [`hw::MechanismCommands`] buffer, and the drivetrain, aim solver, and
//! operator inputs are trait objects supplied at construction. The
//! [`cycle::Orchestrator`] owns everything and steps it once per cycle.

pub mod auto;
pub mod config;
pub mod cycle;
pub mod hw;
pub mod intent;
pub mod safety;
pub mod state;
