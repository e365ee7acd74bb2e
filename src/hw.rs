//! Collaborator contracts between the coordination layer and the rest of the
//! robot program.
//!
//! Everything here is a narrow seam: the coordination layer never polls
//! devices or runs control loops itself. Sensors arrive as one immutable
//! [`SensorSnapshot`] per cycle, actuator setpoints leave through one
//! [`MechanismCommands`] buffer per cycle, and the drivetrain, aim solver,
//! and operator inputs are reached through small traits supplied at
//! construction.

/// One cycle's worth of cached hardware readings.
///
/// Position/velocity readings are `None` when the underlying reading is
/// stale or missing; consumers must treat `None` as "not yet at setpoint",
/// never as success.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Pivot angle [deg].
    pub pivot_angle: Option<f64>,
    /// Trigger intake deployment angle [deg].
    pub intake_deploy_angle: Option<f64>,
    /// Flywheel surface velocity [rot/s].
    pub flywheel_velocity: Option<f64>,
    /// Climber extension [0..1 of full travel].
    pub climber_extension: Option<f64>,
    /// Diverter extension [0..1 of full travel].
    pub diverter_extension: Option<f64>,

    /// Beam-break at the flywheel entrance (piece seated against flywheels).
    pub flywheel_switch: bool,
    /// Beam-break at the trigger wheel (piece held, ready to feed).
    pub trigger_switch: bool,
    /// A piece just left the shooter (velocity dip on the flywheels).
    pub shot_detected: bool,

    /// Robot X in the blue-alliance field frame [m], for distance-gated
    /// automation. Supplied by the pose estimator, already alliance-flipped.
    pub field_x_blue: f64,
    /// Whether the drivetrain's active path (if any) has finished.
    pub path_finished: bool,
}

// ─── Actuator command buffer ────────────────────────────────────────

/// Pivot command mode: closed-loop angle servo or open-loop jog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PivotCommand {
    /// Hold the given angle [deg].
    Angle(f64),
    /// Raw duty cycle [-1..1], operator jog only.
    Percent(f64),
}

/// Climber command mode: position servo or open-loop jog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimberCommand {
    /// Servo to the given extension [0..1].
    Extension(f64),
    /// Raw duty cycle [-1..1], operator jog only.
    Percent(f64),
}

/// Per-cycle outbound setpoints for every mechanism.
///
/// Rebuilt every cycle by the state machine updates, then optionally
/// overwritten field-by-field by the operator override pass. Whatever is in
/// the buffer at the end of the cycle is what gets sent to the motor
/// controllers; delivery is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MechanismCommands {
    pub pivot: PivotCommand,
    /// Flywheel velocity setpoint [rot/s].
    pub flywheel_velocity: f64,
    /// Trigger wheel duty cycle [-1..1].
    pub trigger_percent: f64,
    /// Trigger intake deployment angle [deg].
    pub intake_deploy_angle: f64,
    /// Trigger intake roller duty cycle [-1..1].
    pub intake_roller_speed: f64,
    pub climber: ClimberCommand,
    /// Diverter extension setpoint [0..1].
    pub diverter_extension: f64,
}

impl Default for MechanismCommands {
    /// Safe idle: everything retracted, nothing spinning.
    fn default() -> Self {
        Self {
            pivot: PivotCommand::Angle(crate::state::pivot::PivotState::Rest.angle()),
            flywheel_velocity: 0.0,
            trigger_percent: 0.0,
            intake_deploy_angle: 0.0,
            intake_roller_speed: 0.0,
            climber: ClimberCommand::Extension(0.0),
            diverter_extension: 0.0,
        }
    }
}

// ─── Drivetrain ─────────────────────────────────────────────────────

/// High-level drivetrain behavior requested each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    /// Track the aim solver's heading while translating on driver sticks.
    Aim,
    /// Point the wheels inward and hold position.
    LockIn,
    /// Robot-relative open-loop teleop.
    RobotCentric,
    /// Field-relative teleop, open-loop wheel velocities.
    OpenLoopTeleop,
    /// Field-relative teleop, closed-loop wheel velocities.
    ClosedLoopTeleop,
    /// Follow the most recently started path handle.
    FollowPath,
    /// Seek a detected game piece.
    DriveToTarget,
}

/// Opaque handle to a pre-generated path.
///
/// The coordination layer only ever starts, swaps, and cancels handles;
/// trajectory contents live entirely in the path follower.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathHandle {
    pub name: &'static str,
    /// Nominal duration of the trajectory [s], used for action timeouts.
    pub duration_s: f64,
}

/// Drivetrain contract. Mode requests and path starts are re-issued every
/// cycle by design so a dropped cycle never loses a request; implementations
/// must treat starting the already-active handle as a no-op.
pub trait Drivetrain {
    fn request_mode(&mut self, mode: DriveMode);
    fn start_path(&mut self, path: PathHandle);
    fn cancel_path(&mut self);
}

// ─── Aim solver ─────────────────────────────────────────────────────

/// Firing solution provider. Computed externally from pose and velocity,
/// queried (never recomputed) by the coordination layer.
pub trait AimSolution {
    /// Pivot angle that puts the piece on target [deg].
    fn target_pivot_angle(&self) -> f64;
    /// Flywheel velocity for the current range [rot/s].
    fn target_flywheel_velocity(&self) -> f64;
    /// Whether a shot released right now would score.
    ///
    /// The active implementation is operator-confirmed (the place button).
    /// A timer/velocity/alignment-based gate can be swapped in behind this
    /// same method without touching the shooter state machine.
    fn shot_ready(&self) -> bool;
}

// ─── Operator intent ────────────────────────────────────────────────

/// Raw operator/automation inputs, polled once per cycle.
///
/// Every method is a pure, side-effect-free read of the latest input state.
/// Defaults return neutral (false / 0.0) so implementations only bind the
/// controls their hardware actually has.
pub trait IntentSource {
    // Sticky mode selections.
    fn wants_speaker_mode(&self) -> bool {
        false
    }
    fn wants_amp_mode(&self) -> bool {
        false
    }
    fn wants_climb_mode(&self) -> bool {
        false
    }
    fn wants_panic_mode(&self) -> bool {
        false
    }

    // Momentary inputs.
    fn wants_stow(&self) -> bool {
        false
    }
    /// General "place" confirmation; meaning varies by mode.
    fn wants_place(&self) -> bool {
        false
    }
    fn wants_align(&self) -> bool {
        false
    }
    fn wants_climb_extend(&self) -> bool {
        false
    }
    fn wants_climb_retract(&self) -> bool {
        false
    }
    fn wants_aim_layup(&self) -> bool {
        false
    }
    fn wants_aim_protected(&self) -> bool {
        false
    }
    fn wants_aim_under_stage(&self) -> bool {
        false
    }
    fn wants_aim_wingline(&self) -> bool {
        false
    }
    fn wants_aim_centerline(&self) -> bool {
        false
    }
    fn wants_auto_aim(&self) -> bool {
        false
    }

    // Drivetrain requests.
    fn drive_lock_in(&self) -> bool {
        false
    }
    fn drive_robot_centric(&self) -> bool {
        false
    }
    fn drive_open_loop(&self) -> bool {
        true
    }
    fn drive_to_target(&self) -> bool {
        false
    }

    // Mode overrides.
    fn force_aim(&self) -> bool {
        false
    }
    fn force_intake_back(&self) -> bool {
        false
    }
    /// Spin everything backwards. Bypasses the state machines entirely.
    fn eject(&self) -> bool {
        false
    }

    // Manual jog axes [-1..1]. Latching behavior lives in the resolver.
    fn jog_pivot(&self) -> f64 {
        0.0
    }
    fn jog_trigger(&self) -> f64 {
        0.0
    }
    fn jog_climber(&self) -> f64 {
        0.0
    }
    /// Clears all jog latches, returning the mechanisms to automated control.
    fn reset_manual_inputs(&self) -> bool {
        false
    }
}

/// All-neutral intent source: no buttons bound, sticks centered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralIntent;

impl IntentSource for NeutralIntent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_commands_are_safe_idle() {
        let cmds = MechanismCommands::default();
        assert_eq!(cmds.flywheel_velocity, 0.0);
        assert_eq!(cmds.trigger_percent, 0.0);
        assert_eq!(cmds.intake_roller_speed, 0.0);
        assert_eq!(cmds.climber, ClimberCommand::Extension(0.0));
        assert_eq!(cmds.diverter_extension, 0.0);
    }

    #[test]
    fn neutral_intent_reads_neutral() {
        let oi = NeutralIntent;
        assert!(!oi.wants_speaker_mode());
        assert!(!oi.eject());
        assert_eq!(oi.jog_pivot(), 0.0);
        // Open-loop teleop is the neutral drive preference.
        assert!(oi.drive_open_loop());
    }

    #[test]
    fn stale_snapshot_reads_none() {
        let snap = SensorSnapshot::default();
        assert!(snap.pivot_angle.is_none());
        assert!(snap.flywheel_velocity.is_none());
    }
}
