//! Climber state machine.
//!
//! Two states, one number: the climber is either stowed or reaching. The
//! interesting coordination (no intaking mid-climb, pivot to the climb
//! angle) happens in the superstructure mapping, not here.

use tracing::debug;

use crate::hw::{ClimberCommand, MechanismCommands, SensorSnapshot};

/// Extension convergence tolerance for `transitioning()` [0..1 travel].
pub const EXTENSION_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimberState {
    #[default]
    Retract,
    Extend,
}

impl ClimberState {
    /// Target extension [0..1 of full travel].
    pub const fn extension(self) -> f64 {
        match self {
            Self::Retract => 0.0,
            Self::Extend => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClimberStateMachine {
    state: ClimberState,
    commanded: Option<f64>,
}

impl ClimberStateMachine {
    pub const fn new() -> Self {
        Self {
            state: ClimberState::Retract,
            commanded: None,
        }
    }

    pub fn request(&mut self, state: ClimberState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "climber state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> ClimberState {
        self.state
    }

    pub fn update(&mut self, commands: &mut MechanismCommands) {
        let extension = self.state.extension();
        self.commanded = Some(extension);
        commands.climber = ClimberCommand::Extension(extension);
    }

    /// True until the winch has reached the last commanded extension.
    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        match (snap.climber_extension, self.commanded) {
            (Some(actual), Some(target)) => (actual - target).abs() > EXTENSION_TOLERANCE,
            _ => true,
        }
    }
}

impl Default for ClimberStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
