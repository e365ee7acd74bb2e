//! Diverter state machine.
//!
//! A small flipper that redirects pieces out the top of the robot. It can
//! only leave the frame once the pivot has swung past vertical, so its
//! extend request is clamped by the interlock planner rather than trusted.

use tracing::debug;

use crate::hw::{MechanismCommands, SensorSnapshot};
use crate::safety::interlock::InterlockPlanner;

/// Extension convergence tolerance for `transitioning()` [0..1 travel].
pub const EXTENSION_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiverterState {
    #[default]
    Retract,
    Extend,
}

impl DiverterState {
    /// Target extension [0..1 of full travel].
    pub const fn extension(self) -> f64 {
        match self {
            Self::Retract => 0.0,
            Self::Extend => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DiverterStateMachine {
    state: DiverterState,
    commanded: Option<f64>,
}

impl DiverterStateMachine {
    pub const fn new() -> Self {
        Self {
            state: DiverterState::Retract,
            commanded: None,
        }
    }

    pub fn request(&mut self, state: DiverterState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "diverter state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> DiverterState {
        self.state
    }

    /// Emit the target extension, substituting the retracted position while
    /// the interlock denies extension.
    pub fn update(&mut self, interlocks: &InterlockPlanner, commands: &mut MechanismCommands) {
        let extension = if self.state == DiverterState::Extend && !interlocks.can_extend_diverter()
        {
            debug!("diverter extend clamped: pivot not clear");
            DiverterState::Retract.extension()
        } else {
            self.state.extension()
        };

        self.commanded = Some(extension);
        commands.diverter_extension = extension;
    }

    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        match (snap.diverter_extension, self.commanded) {
            (Some(actual), Some(target)) => (actual - target).abs() > EXTENSION_TOLERANCE,
            _ => true,
        }
    }
}

impl Default for DiverterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::snapshot_at;

    #[test]
    fn extend_clamped_until_pivot_clear() {
        let mut sm = DiverterStateMachine::new();
        let mut cmds = MechanismCommands::default();
        let mut planner = InterlockPlanner::new();

        // Pivot below vertical: extend request held at retract.
        planner.update(&snapshot_at(45.0, 0.0));
        sm.request(DiverterState::Extend);
        sm.update(&planner, &mut cmds);
        assert_eq!(cmds.diverter_extension, 0.0);
        // The requested state itself is untouched; only the command clamps.
        assert_eq!(sm.state(), DiverterState::Extend);

        // Pivot past vertical: extension goes through.
        planner.update(&snapshot_at(95.0, 0.0));
        sm.update(&planner, &mut cmds);
        assert_eq!(cmds.diverter_extension, 1.0);
    }

    #[test]
    fn transitioning_follows_clamped_command() {
        let mut sm = DiverterStateMachine::new();
        let mut cmds = MechanismCommands::default();
        let mut planner = InterlockPlanner::new();
        planner.update(&snapshot_at(45.0, 0.0));

        sm.request(DiverterState::Extend);
        sm.update(&planner, &mut cmds);

        // Clamped to 0.0, and the sensor reads 0.0: converged.
        let mut snap = snapshot_at(45.0, 0.0);
        snap.diverter_extension = Some(0.0);
        assert!(!sm.transitioning(&snap));
    }
}
