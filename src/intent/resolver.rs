//! Operator/automation intent resolution.
//!
//! One call per cycle turns the raw inputs into the wanted superstructure
//! state and drive mode, with a strict precedence: hard stow, forced
//! overrides, manual intake requests, then mode-specific automation, then
//! safe idle. A second pass after the state machines have run applies the
//! latched manual jog controls and the eject override directly to the
//! command buffer, bypassing the state machines entirely.

use tracing::debug;

use crate::config::KestrelConfig;
use crate::hw::{DriveMode, IntentSource, MechanismCommands, PivotCommand, SensorSnapshot};
use crate::intent::note_tracker::PieceLocation;
use crate::state::pivot::PivotState;
use crate::state::superstructure::SuperstructureState;

/// Scale from the raw pivot jog axis to duty cycle.
const PIVOT_JOG_SCALE: f64 = 0.35;

/// Operator-selected top-level mode. Sticky: persists until another mode
/// select is pressed (or amp mode times itself out after a score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TeleopMode {
    /// Score into the speaker; aiming automation active.
    Speaker,
    /// Score into the amp; alignment automation active.
    Amp,
    /// Climb; joysticks drive the climber.
    Climb,
    /// No automation at all. The safe default.
    #[default]
    Panic,
}

/// Which aim preset the speaker automation uses. Sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AimMode {
    Layup,
    Protected,
    UnderStage,
    Wingline,
    Centerline,
    #[default]
    Auto,
}

/// Climb sub-mode. Sticky inside climb mode; resets to `Align` on leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimbMode {
    #[default]
    Align,
    Extend,
    Retract,
}

/// Driver intake request, recomputed every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakingMode {
    #[default]
    None,
    Back,
}

/// Stateful input translator. Constructed once; owns the raw input source
/// and every sticky/latched selection.
///
/// Reset triggers for the persisted fields:
/// - `mode`: replaced by any mode-select input; amp mode also falls back to
///   panic after the amp-exit delay.
/// - `aim_mode`: replaced by any aim-select input.
/// - `climb_mode`: reset to align whenever the mode is not climb.
/// - jog latches: cleared by the explicit reset input; the climber latch
///   additionally clears on leaving climb mode.
pub struct IntentResolver {
    source: Box<dyn IntentSource>,

    mode: TeleopMode,
    aim_mode: AimMode,
    climb_mode: ClimbMode,
    intaking: IntakingMode,
    /// Whether the speaker automation decided to aim this cycle; feeds the
    /// drive mode resolution.
    aiming: bool,
    /// Elapsed time since a piece was seen leaving into the amp [s].
    amp_exit_elapsed: Option<f64>,

    jog_pivot_latch: bool,
    jog_climber_latch: bool,
    jog_trigger_latch: bool,

    // Automation thresholds, from config.
    auto_aim_x_m: f64,
    layup_x_m: f64,
    amp_exit_delay_s: f64,
    pivot_deadband: f64,
    climber_deadband: f64,
    trigger_deadband: f64,
}

impl IntentResolver {
    pub fn new(source: Box<dyn IntentSource>, config: &KestrelConfig) -> Self {
        Self {
            source,
            mode: TeleopMode::Panic,
            aim_mode: AimMode::Auto,
            climb_mode: ClimbMode::Align,
            intaking: IntakingMode::None,
            aiming: false,
            amp_exit_elapsed: None,
            jog_pivot_latch: false,
            jog_climber_latch: false,
            jog_trigger_latch: false,
            auto_aim_x_m: config.automation.auto_aim_x_m,
            layup_x_m: config.automation.layup_x_m,
            amp_exit_delay_s: config.automation.amp_exit_delay_s,
            pivot_deadband: config.jog.pivot_deadband,
            climber_deadband: config.jog.climber_deadband,
            trigger_deadband: config.jog.trigger_deadband,
        }
    }

    #[inline]
    pub const fn mode(&self) -> TeleopMode {
        self.mode
    }

    #[inline]
    pub const fn aim_mode(&self) -> AimMode {
        self.aim_mode
    }

    /// Whether the speaker automation is actively aiming.
    #[inline]
    pub const fn aiming(&self) -> bool {
        self.aiming
    }

    pub const fn jog_pivot_latched(&self) -> bool {
        self.jog_pivot_latch
    }

    pub const fn jog_climber_latched(&self) -> bool {
        self.jog_climber_latch
    }

    pub const fn jog_trigger_latched(&self) -> bool {
        self.jog_trigger_latch
    }

    /// Operator shot/place confirmation, forwarded into the mechanism
    /// updates. This is the active shot-ready gate.
    pub fn wants_place(&self) -> bool {
        self.source.wants_place()
    }

    /// Resolve the wanted superstructure state for this cycle.
    ///
    /// `piece` is the tracked game-piece location; `dt` is the cycle period
    /// [s], used by the amp-exit timer.
    pub fn wanted_state(
        &mut self,
        snap: &SensorSnapshot,
        piece: PieceLocation,
        dt: f64,
    ) -> SuperstructureState {
        self.update_amp_exit_timer(snap, dt);

        // Sticky mode selection.
        if self.source.wants_amp_mode() {
            self.set_mode(TeleopMode::Amp);
        }
        if self.source.wants_climb_mode() {
            self.set_mode(TeleopMode::Climb);
        }
        if self.source.wants_speaker_mode() {
            self.set_mode(TeleopMode::Speaker);
        }
        if self.source.wants_panic_mode() {
            self.set_mode(TeleopMode::Panic);
        }

        if self.mode != TeleopMode::Climb {
            self.climb_mode = ClimbMode::Align;
        }

        // 1. Hard stow, honored regardless of mode.
        if self.source.wants_stow() {
            return SuperstructureState::Stow;
        }
        // 2. Forced override straight into solver-driven aim.
        if self.source.force_aim() {
            return SuperstructureState::AutoAim;
        }

        // 3. Driver intake requests beat modes and automation.
        self.intaking = if self.source.force_intake_back() {
            IntakingMode::Back
        } else {
            IntakingMode::None
        };
        if self.intaking == IntakingMode::Back {
            return SuperstructureState::IntakeBack;
        }

        // Sticky aim preset selection.
        if self.source.wants_aim_layup() {
            self.aim_mode = AimMode::Layup;
        }
        if self.source.wants_aim_protected() {
            self.aim_mode = AimMode::Protected;
        }
        if self.source.wants_aim_under_stage() {
            self.aim_mode = AimMode::UnderStage;
        }
        if self.source.wants_aim_wingline() {
            self.aim_mode = AimMode::Wingline;
        }
        if self.source.wants_aim_centerline() {
            self.aim_mode = AimMode::Centerline;
        }
        if self.source.wants_auto_aim() {
            self.aim_mode = AimMode::Auto;
        }

        // 4. Mode-specific automation.
        match self.mode {
            TeleopMode::Amp => {
                self.aiming = false;
                SuperstructureState::AlignAmp
            }
            TeleopMode::Climb => {
                self.aiming = false;
                self.climb_mode = self.wanted_climb_mode();
                match self.climb_mode {
                    ClimbMode::Align => SuperstructureState::AlignClimb,
                    ClimbMode::Extend => SuperstructureState::ClimbExtend,
                    ClimbMode::Retract => SuperstructureState::ClimbRetract,
                }
            }
            TeleopMode::Speaker => {
                self.aiming = self.wants_aim(snap, piece);
                if self.aiming {
                    self.aim_state()
                } else {
                    SuperstructureState::Rest
                }
            }
            // 5. Default: safe idle.
            TeleopMode::Panic => {
                self.aiming = false;
                SuperstructureState::Rest
            }
        }
    }

    /// Resolve the wanted drive mode. Forced or automated aiming beats
    /// everything; then wheel lock, robot-centric, and target seeking; the
    /// default is field-relative teleop in the driver's preferred loop mode.
    pub fn wanted_drive_mode(&self) -> DriveMode {
        if self.source.force_aim()
            || (self.aiming && self.mode == TeleopMode::Speaker && self.intaking == IntakingMode::None)
        {
            return DriveMode::Aim;
        }
        if self.source.drive_lock_in() {
            return DriveMode::LockIn;
        }
        if self.source.drive_robot_centric() {
            return DriveMode::RobotCentric;
        }
        if self.source.drive_to_target() {
            return DriveMode::DriveToTarget;
        }
        if self.source.drive_open_loop() {
            DriveMode::OpenLoopTeleop
        } else {
            DriveMode::ClosedLoopTeleop
        }
    }

    /// Second pass, run after the state machines have written the command
    /// buffer: latched jog controls and the eject override overwrite the
    /// state-machine commands field by field. While a latch is set the
    /// corresponding mechanism is fully manual until the reset input.
    ///
    /// Returns true if the eject override is active this cycle (the piece
    /// tracker wants to know).
    pub fn handle_overrides(&mut self, commands: &mut MechanismCommands) -> bool {
        let ejecting = self.source.eject();
        if ejecting {
            commands.intake_roller_speed = -1.0;
            commands.trigger_percent = 1.0;
            commands.flywheel_velocity = 20.0;
        }

        let raw_pivot = self.source.jog_pivot();
        let raw_trigger = self.source.jog_trigger();
        let mut raw_climber = self.source.jog_climber();
        if self.mode != TeleopMode::Climb {
            raw_climber = 0.0;
        }

        if self.source.reset_manual_inputs() {
            if self.jog_pivot_latch || self.jog_climber_latch || self.jog_trigger_latch {
                debug!("jog latches cleared");
            }
            self.jog_pivot_latch = false;
            self.jog_climber_latch = false;
            self.jog_trigger_latch = false;
        }
        // Leaving climb mode always releases the climber.
        if self.mode != TeleopMode::Climb {
            self.jog_climber_latch = false;
        }

        if self.jog_pivot_latch
            || (raw_pivot.abs() > self.pivot_deadband && self.mode != TeleopMode::Climb)
        {
            self.jog_pivot_latch = true;
            commands.pivot = PivotCommand::Percent(raw_pivot * PIVOT_JOG_SCALE);
        }

        if self.jog_climber_latch
            || (raw_climber.abs() > self.climber_deadband && self.mode == TeleopMode::Climb)
        {
            self.jog_climber_latch = true;
            // Hold the pivot at the climb angle while winching by hand.
            commands.pivot = PivotCommand::Angle(PivotState::Climb.angle());
            commands.climber = crate::hw::ClimberCommand::Percent(raw_climber);
        }

        if self.jog_trigger_latch
            || (raw_trigger.abs() > self.trigger_deadband && self.mode != TeleopMode::Climb)
        {
            self.jog_trigger_latch = true;
            commands.trigger_percent = raw_trigger / 2.0;
            if raw_trigger < 0.0 {
                // Spin the flywheels out too so a piece can't jam in them.
                commands.flywheel_velocity = raw_trigger * 10.0;
            }
        }

        ejecting
    }

    fn set_mode(&mut self, mode: TeleopMode) {
        if mode != self.mode {
            debug!(from = ?self.mode, to = ?mode, "teleop mode");
        }
        self.mode = mode;
    }

    /// Amp mode ends itself shortly after the piece leaves: once the
    /// flywheel switch sees the hand-off, a timer starts, and when it
    /// expires the mode falls back to panic so the operator can drive away
    /// without un-selecting amp.
    fn update_amp_exit_timer(&mut self, snap: &SensorSnapshot, dt: f64) {
        if self.mode != TeleopMode::Amp {
            self.amp_exit_elapsed = None;
            return;
        }
        if let Some(elapsed) = &mut self.amp_exit_elapsed {
            *elapsed += dt;
            if *elapsed > self.amp_exit_delay_s {
                self.set_mode(TeleopMode::Panic);
                self.amp_exit_elapsed = None;
                return;
            }
        }
        if snap.flywheel_switch && self.amp_exit_elapsed.is_none() {
            self.amp_exit_elapsed = Some(0.0);
        }
    }

    /// Distance-gated aim decision. Requires the piece to be confirmed in
    /// the shooter, and the robot close enough (blue-alliance X) for the
    /// active preset.
    fn wants_aim(&self, snap: &SensorSnapshot, piece: PieceLocation) -> bool {
        if piece != PieceLocation::Shooter {
            return false;
        }
        if snap.field_x_blue > self.layup_x_m && self.aim_mode == AimMode::Layup {
            return false;
        }
        snap.field_x_blue < self.auto_aim_x_m
    }

    const fn aim_state(&self) -> SuperstructureState {
        match self.aim_mode {
            AimMode::Layup => SuperstructureState::AimLayup,
            AimMode::Protected => SuperstructureState::AimProtected,
            AimMode::UnderStage => SuperstructureState::AimUnderStage,
            AimMode::Wingline => SuperstructureState::AimWingline,
            AimMode::Centerline => SuperstructureState::AimCenterline,
            AimMode::Auto => SuperstructureState::AutoAim,
        }
    }

    /// Climb sub-mode selection. The align input is a hold-to-advance
    /// enable: releasing it drops back to align, and while held the extend/
    /// retract requests latch the sub-mode forward.
    fn wanted_climb_mode(&self) -> ClimbMode {
        if !self.source.wants_align() {
            return ClimbMode::Align;
        }
        if self.source.wants_climb_extend() {
            return ClimbMode::Extend;
        }
        if self.source.wants_climb_retract() {
            return ClimbMode::Retract;
        }
        self.climb_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedIntent;

    fn resolver(source: ScriptedIntent) -> IntentResolver {
        IntentResolver::new(Box::new(source.clone()), &KestrelConfig::default())
    }

    fn snap_at_x(x: f64) -> SensorSnapshot {
        SensorSnapshot {
            field_x_blue: x,
            ..Default::default()
        }
    }

    #[test]
    fn default_mode_is_panic_rest() {
        let mut r = resolver(ScriptedIntent::default());
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::Rest);
        assert_eq!(r.mode(), TeleopMode::Panic);
    }

    #[test]
    fn mode_is_sticky_across_cycles() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        let mut r = resolver(source.clone());
        r.wanted_state(&snap_at_x(10.0), PieceLocation::None, 0.02);
        assert_eq!(r.mode(), TeleopMode::Speaker);

        // Button released: mode persists.
        source.set_bool("speaker_mode", false);
        r.wanted_state(&snap_at_x(10.0), PieceLocation::None, 0.02);
        assert_eq!(r.mode(), TeleopMode::Speaker);
    }

    #[test]
    fn stow_beats_everything() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        source.set_bool("stow", true);
        source.set_bool("force_aim", true);
        let mut r = resolver(source);
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::Stow);
    }

    #[test]
    fn force_aim_beats_modes() {
        let source = ScriptedIntent::default();
        source.set_bool("force_aim", true);
        let mut r = resolver(source);
        let state = r.wanted_state(&snap_at_x(12.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::AutoAim);
    }

    #[test]
    fn intake_request_beats_automation() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        source.set_bool("force_intake_back", true);
        let mut r = resolver(source);
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::IntakeBack);
    }

    #[test]
    fn speaker_aims_only_with_piece_in_shooter() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        let mut r = resolver(source);

        // Scenario E: in range but no piece — never aim.
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::Rest);
        assert!(!r.aiming());

        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::AutoAim);
        assert!(r.aiming());
    }

    #[test]
    fn speaker_aim_is_distance_gated() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        let mut r = resolver(source);

        // Past the auto-aim line: rest.
        let state = r.wanted_state(&snap_at_x(8.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::Rest);

        let state = r.wanted_state(&snap_at_x(6.5), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::AutoAim);
    }

    #[test]
    fn layup_preset_needs_point_blank_range() {
        let source = ScriptedIntent::default();
        source.set_bool("speaker_mode", true);
        source.set_bool("aim_layup", true);
        let mut r = resolver(source);

        let state = r.wanted_state(&snap_at_x(4.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::Rest);

        let state = r.wanted_state(&snap_at_x(1.5), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::AimLayup);
    }

    #[test]
    fn climb_mode_sequencing() {
        let source = ScriptedIntent::default();
        source.set_bool("climb_mode", true);
        let mut r = resolver(source.clone());
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::AlignClimb);

        source.set_bool("align", true);
        source.set_bool("climb_extend", true);
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::ClimbExtend);

        // Extend released but align still held: sub-mode is sticky.
        source.set_bool("climb_extend", false);
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::ClimbExtend);

        source.set_bool("climb_retract", true);
        let state = r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        assert_eq!(state, SuperstructureState::ClimbRetract);
    }

    #[test]
    fn amp_mode_times_out_after_score() {
        let source = ScriptedIntent::default();
        source.set_bool("amp_mode", true);
        let mut r = resolver(source.clone());

        // Latch the mode while the button is down, then release it.
        let state = r.wanted_state(&snap_at_x(1.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::AlignAmp);
        source.set_bool("amp_mode", false);

        let state = r.wanted_state(&snap_at_x(1.0), PieceLocation::Shooter, 0.02);
        assert_eq!(state, SuperstructureState::AlignAmp);

        // Piece seen leaving into the amp: timer starts.
        let mut scored = snap_at_x(1.0);
        scored.flywheel_switch = true;
        r.wanted_state(&scored, PieceLocation::Shooter, 0.02);
        assert_eq!(r.mode(), TeleopMode::Amp);

        // 0.6 s later the mode has fallen back to panic.
        for _ in 0..30 {
            r.wanted_state(&snap_at_x(1.0), PieceLocation::None, 0.02);
        }
        assert_eq!(r.mode(), TeleopMode::Panic);
    }

    #[test]
    fn drive_mode_precedence() {
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        assert_eq!(r.wanted_drive_mode(), DriveMode::OpenLoopTeleop);

        source.set_bool("drive_closed_loop", true);
        assert_eq!(r.wanted_drive_mode(), DriveMode::ClosedLoopTeleop);

        // Stack the tiers bottom-up, then peel them off top-down.
        source.set_bool("drive_to_target", true);
        assert_eq!(r.wanted_drive_mode(), DriveMode::DriveToTarget);

        source.set_bool("robot_centric", true);
        assert_eq!(r.wanted_drive_mode(), DriveMode::RobotCentric);

        source.set_bool("lock_in", true);
        assert_eq!(r.wanted_drive_mode(), DriveMode::LockIn);

        source.set_bool("force_aim", true);
        assert_eq!(r.wanted_drive_mode(), DriveMode::Aim);

        source.set_bool("force_aim", false);
        assert_eq!(r.wanted_drive_mode(), DriveMode::LockIn);

        source.set_bool("lock_in", false);
        assert_eq!(r.wanted_drive_mode(), DriveMode::RobotCentric);

        source.set_bool("robot_centric", false);
        assert_eq!(r.wanted_drive_mode(), DriveMode::DriveToTarget);

        // Automated aiming also claims the drivetrain.
        source.set_bool("drive_to_target", false);
        source.set_bool("drive_closed_loop", false);
        source.set_bool("speaker_mode", true);
        r.wanted_state(&snap_at_x(3.0), PieceLocation::Shooter, 0.02);
        assert!(r.aiming());
        assert_eq!(r.wanted_drive_mode(), DriveMode::Aim);
    }

    #[test]
    fn jog_pivot_latch_survives_stick_release() {
        // Scenario C: 0.25 exceeds the 0.2 deadband; the latch then holds
        // through the stick returning to 0.05.
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        let mut cmds = MechanismCommands::default();

        source.set_axis("jog_pivot", 0.25);
        r.handle_overrides(&mut cmds);
        assert!(r.jog_pivot_latched());
        assert_eq!(cmds.pivot, PivotCommand::Percent(0.25 * PIVOT_JOG_SCALE));

        source.set_axis("jog_pivot", 0.05);
        let mut cmds = MechanismCommands::default();
        r.handle_overrides(&mut cmds);
        assert!(r.jog_pivot_latched());
        assert_eq!(cmds.pivot, PivotCommand::Percent(0.05 * PIVOT_JOG_SCALE));

        // Explicit reset restores automated control.
        source.set_bool("reset_manual", true);
        let mut cmds = MechanismCommands::default();
        r.handle_overrides(&mut cmds);
        assert!(!r.jog_pivot_latched());
        assert!(matches!(cmds.pivot, PivotCommand::Angle(_)));
    }

    #[test]
    fn sub_deadband_input_does_not_latch() {
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        let mut cmds = MechanismCommands::default();

        source.set_axis("jog_pivot", 0.15);
        source.set_axis("jog_trigger", 0.05);
        r.handle_overrides(&mut cmds);
        assert!(!r.jog_pivot_latched());
        assert!(!r.jog_trigger_latched());
    }

    #[test]
    fn climber_jog_requires_climb_mode() {
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        let mut cmds = MechanismCommands::default();

        source.set_axis("jog_climber", 0.8);
        r.handle_overrides(&mut cmds);
        assert!(!r.jog_climber_latched());

        source.set_bool("climb_mode", true);
        r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        r.handle_overrides(&mut cmds);
        assert!(r.jog_climber_latched());
        assert_eq!(cmds.climber, crate::hw::ClimberCommand::Percent(0.8));
        // Pivot held at the climb angle while winching.
        assert_eq!(cmds.pivot, PivotCommand::Angle(PivotState::Climb.angle()));

        // Leaving climb mode clears the climber latch without the reset.
        source.set_bool("climb_mode", false);
        source.set_bool("panic_mode", true);
        r.wanted_state(&snap_at_x(3.0), PieceLocation::None, 0.02);
        let mut cmds = MechanismCommands::default();
        r.handle_overrides(&mut cmds);
        assert!(!r.jog_climber_latched());
    }

    #[test]
    fn trigger_jog_spills_flywheels_in_reverse() {
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        let mut cmds = MechanismCommands::default();

        source.set_axis("jog_trigger", -0.5);
        r.handle_overrides(&mut cmds);
        assert!(r.jog_trigger_latched());
        assert_eq!(cmds.trigger_percent, -0.25);
        assert_eq!(cmds.flywheel_velocity, -5.0);
    }

    #[test]
    fn eject_overrides_commands() {
        let source = ScriptedIntent::default();
        let mut r = resolver(source.clone());
        let mut cmds = MechanismCommands::default();

        source.set_bool("eject", true);
        let ejecting = r.handle_overrides(&mut cmds);
        assert!(ejecting);
        assert_eq!(cmds.intake_roller_speed, -1.0);
        assert_eq!(cmds.trigger_percent, 1.0);
        assert_eq!(cmds.flywheel_velocity, 20.0);
    }
}
