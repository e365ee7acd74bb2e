//! Shooter state machine (flywheels + trigger wheel).
//!
//! The shooter is the only mechanism with two coupled actuators: the
//! flywheel pair that launches the piece and the trigger wheel that feeds
//! it. `AutoAim`, `IntakeAndAim`, and `Shoot` take their flywheel velocity
//! from the aim solver; everything else runs the static table.

use tracing::debug;

use crate::hw::{AimSolution, MechanismCommands, SensorSnapshot};

/// Flywheel convergence tolerance for `transitioning()` [rot/s].
pub const FLYWHEEL_TOLERANCE_RPS: f64 = 2.5;

/// Constant setpoint pair carried by each static state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShooterSetpoint {
    /// Flywheel velocity [rot/s].
    pub flywheel_rps: f64,
    /// Trigger wheel duty cycle [-1..1].
    pub trigger_percent: f64,
}

const fn setpoint(flywheel_rps: f64, trigger_percent: f64) -> ShooterSetpoint {
    ShooterSetpoint {
        flywheel_rps,
        trigger_percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShooterState {
    /// Spin everything down.
    #[default]
    RampDown,
    /// Pull a piece in through the trigger, flywheels backdriven so the
    /// piece can't escape out the front.
    Intake,
    /// Piece detected: creep it forward until seated at the trigger switch.
    Index,
    AimLayup,
    AimProtected,
    AimUnderStage,
    AimWingline,
    AimCenterline,
    /// Flywheel velocity from the aim solver.
    AutoAim,
    /// Solver velocity plus the trigger feed, gated on shot readiness.
    Shoot,
    /// Soft lob over the amp lip.
    Amp,
    /// Intake through the trigger while pre-spinning on the solver.
    IntakeAndAim,
    /// Run everything backwards.
    Eject,
}

impl ShooterState {
    /// Static setpoint table. Solver-driven states carry their fallback
    /// values, used if the solver has never produced a solution.
    pub const fn setpoint(self) -> ShooterSetpoint {
        match self {
            Self::RampDown => setpoint(0.0, 0.0),
            Self::Intake => setpoint(-2.0, 0.75),
            Self::Index => setpoint(0.0, 0.15),
            Self::AimLayup => setpoint(35.0, 0.0),
            Self::AimProtected => setpoint(45.0, 0.0),
            Self::AimUnderStage => setpoint(50.0, 0.0),
            Self::AimWingline => setpoint(55.0, 0.0),
            Self::AimCenterline => setpoint(65.0, 0.0),
            Self::AutoAim => setpoint(45.0, 0.0),
            Self::Shoot => setpoint(45.0, 1.0),
            Self::Amp => setpoint(10.0, 0.0),
            Self::IntakeAndAim => setpoint(45.0, 0.75),
            Self::Eject => setpoint(-20.0, -1.0),
        }
    }

    /// States whose flywheel velocity comes from the aim solver.
    pub const fn uses_solver_velocity(self) -> bool {
        matches!(self, Self::AutoAim | Self::Shoot | Self::IntakeAndAim)
    }
}

/// Owns the shooter's current state and last commanded flywheel velocity.
#[derive(Debug, Clone, Copy)]
pub struct ShooterStateMachine {
    state: ShooterState,
    commanded_rps: Option<f64>,
}

impl ShooterStateMachine {
    pub const fn new() -> Self {
        Self {
            state: ShooterState::RampDown,
            commanded_rps: None,
        }
    }

    pub fn request(&mut self, state: ShooterState) {
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "shooter state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> ShooterState {
        self.state
    }

    /// Apply auto-transitions, resolve setpoints, and emit.
    ///
    /// `shot_ready` gates the trigger feed in `Shoot`: until the gate opens
    /// the flywheels hold speed but the piece stays put. Autonomous routines
    /// pass the gate already open since no operator is confirming shots.
    pub fn update(
        &mut self,
        snap: &SensorSnapshot,
        aim: &dyn AimSolution,
        shot_ready: bool,
        commands: &mut MechanismCommands,
    ) {
        // A piece reaching the flywheel switch mid-intake downgrades to
        // indexing regardless of what was requested this cycle.
        if self.state == ShooterState::Intake && snap.flywheel_switch {
            self.state = ShooterState::Index;
        }
        // Stop creeping once the piece is seated at the trigger.
        if self.state == ShooterState::Index && snap.trigger_switch {
            self.state = ShooterState::RampDown;
        }

        let mut sp = self.state.setpoint();
        if self.state.uses_solver_velocity() {
            sp.flywheel_rps = aim.target_flywheel_velocity();
        }
        if self.state == ShooterState::Shoot && !shot_ready {
            sp.trigger_percent = 0.0;
        }

        self.commanded_rps = Some(sp.flywheel_rps);
        commands.flywheel_velocity = sp.flywheel_rps;
        commands.trigger_percent = sp.trigger_percent;
    }

    /// True until the flywheels have spun up (or down) to the last
    /// commanded velocity. Stale velocity readings fail safe.
    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        match (snap.flywheel_velocity, self.commanded_rps) {
            (Some(actual), Some(target)) => (actual - target).abs() > FLYWHEEL_TOLERANCE_RPS,
            _ => true,
        }
    }
}

impl Default for ShooterStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
