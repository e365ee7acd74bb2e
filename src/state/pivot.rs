//! Pivot state machine.
//!
//! The pivot carries the shooter between intake-flat, aim presets, the amp
//! lip, and the climb hooks. `AutoAim` is the one dynamic state: its angle
//! comes from the aim solver instead of the static table.

use tracing::debug;

use crate::hw::{AimSolution, MechanismCommands, PivotCommand, SensorSnapshot};
use crate::safety::interlock::InterlockPlanner;

/// Angle convergence tolerance for `transitioning()` [deg].
pub const ANGLE_TOLERANCE_DEG: f64 = 1.5;

/// Commanded angles above this are clamped until the interlock allows a
/// full flip [deg].
pub const FLIP_CLAMP_DEG: f64 = 80.0;

/// Extra elevation added to the solver angle during autonomous, where the
/// robot shoots from rest and the carpet soaks up some energy [deg].
const AUTONOMOUS_AIM_TRIM_DEG: f64 = 2.0;

/// Pivot target, one constant angle per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotState {
    #[default]
    Rest,
    Intake,
    Stow,
    Amp,
    AmpPush,
    IntakeSource,
    PreClimb,
    Climb,
    AimLayup,
    AimProtected,
    AimUnderStage,
    AimWingline,
    AimCenterline,
    /// Angle from the aim solver.
    AutoAim,
}

impl PivotState {
    /// Static setpoint table [deg]. `AutoAim` carries the fallback angle
    /// used if the solver has never produced a solution.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Rest => 33.0,
            Self::Intake => 17.0,
            Self::Stow => 20.0,
            Self::Amp => 82.0,
            Self::AmpPush => 50.0,
            Self::IntakeSource => 56.0,
            Self::PreClimb => 70.0,
            Self::Climb => 70.0,
            Self::AimLayup => 53.0,
            Self::AimProtected => 37.0,
            Self::AimUnderStage => 30.0,
            Self::AimWingline => 27.0,
            Self::AimCenterline => 25.0,
            Self::AutoAim => 30.0,
        }
    }
}

/// Owns the pivot's current state and last commanded angle.
#[derive(Debug, Clone, Copy)]
pub struct PivotStateMachine {
    state: PivotState,
    /// Angle emitted by the most recent `update` [deg]; `None` before the
    /// first cycle so `transitioning()` fails safe.
    commanded_deg: Option<f64>,
}

impl PivotStateMachine {
    pub const fn new() -> Self {
        Self {
            state: PivotState::Rest,
            commanded_deg: None,
        }
    }

    /// Store the requested state. Always accepted; unsafe angles are
    /// clamped in `update`, not refused here.
    pub fn request(&mut self, state: PivotState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "pivot state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> PivotState {
        self.state
    }

    /// Resolve the target angle, apply the flip interlock clamp, and emit.
    ///
    /// `autonomous` selects the solver trim; `wants_place` escalates `Amp`
    /// to the push-out angle while the operator holds the place button.
    pub fn update(
        &mut self,
        interlocks: &InterlockPlanner,
        aim: &dyn AimSolution,
        autonomous: bool,
        wants_place: bool,
        commands: &mut MechanismCommands,
    ) {
        if self.state == PivotState::Amp && wants_place {
            self.state = PivotState::AmpPush;
        }

        let mut angle = if self.state == PivotState::AutoAim {
            let mut solved = aim.target_pivot_angle();
            if autonomous {
                solved += AUTONOMOUS_AIM_TRIM_DEG;
            }
            solved
        } else {
            self.state.angle()
        };

        // The pivot may not swing past upright while the intake is stowed
        // underneath it; hold at the clamp angle until the intake clears.
        if angle > FLIP_CLAMP_DEG && !interlocks.can_flip_pivot() {
            angle = FLIP_CLAMP_DEG;
        }

        self.commanded_deg = Some(angle);
        commands.pivot = PivotCommand::Angle(angle);
    }

    /// True until the sensed angle has converged on the last commanded
    /// angle. A stale reading or a not-yet-commanded pivot reads as still
    /// transitioning.
    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        match (snap.pivot_angle, self.commanded_deg) {
            (Some(actual), Some(target)) => (actual - target).abs() > ANGLE_TOLERANCE_DEG,
            _ => true,
        }
    }
}

impl Default for PivotStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
