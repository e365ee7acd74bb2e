//! Trigger intake state machine.
//!
//! The rear intake deploys over the bumper, feeds pieces toward the trigger,
//! and folds away when the pivot needs its swing volume. Its avoidance pose
//! is driven entirely by the interlock planner.

use tracing::debug;

use crate::hw::{MechanismCommands, SensorSnapshot};
use crate::safety::interlock::InterlockPlanner;

/// Deployment convergence tolerance for `transitioning()` [deg].
pub const DEPLOY_TOLERANCE_DEG: f64 = 3.0;

/// Constant setpoint pair carried by each state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerIntakeSetpoint {
    /// Deployment angle [deg].
    pub deploy_deg: f64,
    /// Roller duty cycle [-1..1].
    pub roller_speed: f64,
}

const fn setpoint(deploy_deg: f64, roller_speed: f64) -> TriggerIntakeSetpoint {
    TriggerIntakeSetpoint {
        deploy_deg,
        roller_speed,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerIntakeState {
    /// Folded inside the frame.
    #[default]
    Retract,
    /// Deployed, rollers stopped.
    Extend,
    /// Deployed and feeding.
    Intake,
    /// Partially deployed to clear the pivot's swing.
    Avoid,
    /// Deployed, rollers reversed.
    Eject,
}

impl TriggerIntakeState {
    pub const fn setpoint(self) -> TriggerIntakeSetpoint {
        match self {
            Self::Retract => setpoint(0.0, 0.0),
            Self::Extend => setpoint(100.0, 0.0),
            Self::Intake => setpoint(100.0, 0.9),
            Self::Avoid => setpoint(45.0, 0.0),
            Self::Eject => setpoint(60.0, -1.0),
        }
    }
}

/// Owns the trigger intake's current state and last commanded deployment.
#[derive(Debug, Clone, Copy)]
pub struct TriggerIntakeStateMachine {
    state: TriggerIntakeState,
    commanded_deg: Option<f64>,
}

impl TriggerIntakeStateMachine {
    pub const fn new() -> Self {
        Self {
            state: TriggerIntakeState::Retract,
            commanded_deg: None,
        }
    }

    pub fn request(&mut self, state: TriggerIntakeState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "trigger intake state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> TriggerIntakeState {
        self.state
    }

    /// Apply auto-transitions (avoidance swap, piece-detected retract) and
    /// emit the resulting setpoints.
    pub fn update(
        &mut self,
        snap: &SensorSnapshot,
        interlocks: &InterlockPlanner,
        commands: &mut MechanismCommands,
    ) {
        // Swap between the stowed and avoidance poses as the pivot moves
        // through the shared volume.
        if self.state == TriggerIntakeState::Retract && interlocks.trigger_intake_must_avoid() {
            self.state = TriggerIntakeState::Avoid;
        }
        if self.state == TriggerIntakeState::Avoid && !interlocks.trigger_intake_must_avoid() {
            self.state = TriggerIntakeState::Retract;
        }

        // A piece at the trigger ends the intake regardless of the request.
        if self.state == TriggerIntakeState::Intake && snap.trigger_switch {
            self.state = TriggerIntakeState::Retract;
        }

        let sp = self.state.setpoint();
        self.commanded_deg = Some(sp.deploy_deg);
        commands.intake_deploy_angle = sp.deploy_deg;
        commands.intake_roller_speed = sp.roller_speed;
    }

    /// True until the deployment angle has converged on the last command.
    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        match (snap.intake_deploy_angle, self.commanded_deg) {
            (Some(actual), Some(target)) => (actual - target).abs() > DEPLOY_TOLERANCE_DEG,
            _ => true,
        }
    }
}

impl Default for TriggerIntakeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::snapshot_at;

    fn interlocks_with_pivot(pivot_deg: f64) -> InterlockPlanner {
        let mut planner = InterlockPlanner::new();
        planner.update(&snapshot_at(pivot_deg, 0.0));
        planner
    }

    #[test]
    fn retract_swaps_to_avoid_when_pivot_interferes() {
        let mut sm = TriggerIntakeStateMachine::new();
        let mut cmds = MechanismCommands::default();

        // Pivot below the interference band: must avoid.
        sm.update(&snapshot_at(20.0, 0.0), &interlocks_with_pivot(20.0), &mut cmds);
        assert_eq!(sm.state(), TriggerIntakeState::Avoid);
        assert_eq!(cmds.intake_deploy_angle, 45.0);

        // Pivot back in the clear band: return to retract.
        sm.update(&snapshot_at(45.0, 45.0), &interlocks_with_pivot(45.0), &mut cmds);
        assert_eq!(sm.state(), TriggerIntakeState::Retract);
        assert_eq!(cmds.intake_deploy_angle, 0.0);
    }

    #[test]
    fn intake_retracts_on_piece_detect() {
        let mut sm = TriggerIntakeStateMachine::new();
        let mut cmds = MechanismCommands::default();
        sm.request(TriggerIntakeState::Intake);

        let mut snap = snapshot_at(45.0, 100.0);
        snap.trigger_switch = true;
        sm.update(&snap, &interlocks_with_pivot(45.0), &mut cmds);
        assert_eq!(sm.state(), TriggerIntakeState::Retract);
        assert_eq!(cmds.intake_roller_speed, 0.0);
    }

    #[test]
    fn intake_feeds_while_empty() {
        let mut sm = TriggerIntakeStateMachine::new();
        let mut cmds = MechanismCommands::default();
        sm.request(TriggerIntakeState::Intake);
        sm.update(&snapshot_at(45.0, 100.0), &interlocks_with_pivot(45.0), &mut cmds);
        assert_eq!(sm.state(), TriggerIntakeState::Intake);
        assert_eq!(cmds.intake_roller_speed, 0.9);
        assert_eq!(cmds.intake_deploy_angle, 100.0);
    }

    #[test]
    fn transitioning_tracks_deployment() {
        let mut sm = TriggerIntakeStateMachine::new();
        let mut cmds = MechanismCommands::default();
        sm.request(TriggerIntakeState::Extend);
        sm.update(&snapshot_at(45.0, 0.0), &interlocks_with_pivot(45.0), &mut cmds);

        assert!(sm.transitioning(&snapshot_at(45.0, 50.0)));
        assert!(!sm.transitioning(&snapshot_at(45.0, 98.5)));

        let mut stale = snapshot_at(45.0, 98.5);
        stale.intake_deploy_angle = None;
        assert!(sm.transitioning(&stale));
    }
}
