//! Superstructure state machine.
//!
//! Maps one high-level robot state onto a target state for every mechanism
//! through a static, exhaustive table, then drives the mechanism updates in
//! a fixed order: intake family first, then the aim family, then the climb
//! family. Later mechanisms may read interlock predicates that reflect
//! earlier mechanisms' freshly requested positions; the reverse direction is
//! one cycle stale by design.

use tracing::{debug, trace};

use crate::hw::{AimSolution, MechanismCommands, SensorSnapshot};
use crate::safety::interlock::InterlockPlanner;
use crate::state::climber::{ClimberState, ClimberStateMachine};
use crate::state::diverter::{DiverterState, DiverterStateMachine};
use crate::state::pivot::{PivotState, PivotStateMachine};
use crate::state::shooter::{ShooterState, ShooterStateMachine};
use crate::state::trigger_intake::{TriggerIntakeState, TriggerIntakeStateMachine};

/// Desired state for every mechanism, as mapped from one
/// [`SuperstructureState`]. The mapping expresses intent; the mechanism
/// updates may still clamp against live interlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismTargets {
    pub trigger_intake: TriggerIntakeState,
    pub shooter: ShooterState,
    pub pivot: PivotState,
    pub climber: ClimberState,
    pub diverter: DiverterState,
}

const fn targets(
    trigger_intake: TriggerIntakeState,
    shooter: ShooterState,
    pivot: PivotState,
    climber: ClimberState,
) -> MechanismTargets {
    // The diverter is never claimed by a high-level state; it idles
    // retracted and is only reached through direct control.
    MechanismTargets {
        trigger_intake,
        shooter,
        pivot,
        climber,
        diverter: DiverterState::Retract,
    }
}

/// High-level state of the whole superstructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuperstructureState {
    /// Safe idle for every mechanism; the default and the fallback.
    #[default]
    Rest,
    /// Everything tucked for transit under obstacles.
    Stow,
    /// Intake over the front bumper (piece enters through the flywheels).
    IntakeFront,
    /// Intake over the rear bumper (piece enters through the trigger).
    IntakeBack,
    AimLayup,
    AimProtected,
    AimUnderStage,
    AimWingline,
    AimCenterline,
    /// Solver-driven aim on both pivot and flywheels.
    AutoAim,
    /// Aim and feed: the actual release.
    Shoot,
    /// Push a held piece over the amp lip.
    PlaceAmp,
    /// Pre-score amp pose (spun down, pivot up).
    AlignAmp,
    /// Pivot to the pre-climb angle for driving under the chain.
    AlignClimb,
    ClimbExtend,
    ClimbRetract,
    /// Catch a piece fed from the human player station.
    IntakeSource,
    /// Intake while pre-spinning the flywheels.
    IntakeAndAim,
    /// Intake while already tracking the target with the pivot.
    IntakeAndPivotAim,
    /// Intake straight into a shot.
    IntakeAndShoot,
}

impl SuperstructureState {
    /// Static mechanism mapping. Total by construction: the match is
    /// exhaustive, so a variant without a full mapping cannot compile.
    pub const fn targets(self) -> MechanismTargets {
        use ClimberState as C;
        use PivotState as P;
        use ShooterState as S;
        use TriggerIntakeState as T;

        match self {
            Self::Rest => targets(T::Retract, S::RampDown, P::Rest, C::Retract),
            Self::Stow => targets(T::Retract, S::RampDown, P::Stow, C::Retract),
            Self::IntakeFront => targets(T::Retract, S::Intake, P::Intake, C::Retract),
            Self::IntakeBack => targets(T::Intake, S::Intake, P::Intake, C::Retract),
            Self::AimLayup => targets(T::Retract, S::AimLayup, P::AimLayup, C::Retract),
            Self::AimProtected => targets(T::Retract, S::AimProtected, P::AimProtected, C::Retract),
            Self::AimUnderStage => {
                targets(T::Retract, S::AimUnderStage, P::AimUnderStage, C::Retract)
            }
            Self::AimWingline => targets(T::Retract, S::AimWingline, P::AimWingline, C::Retract),
            Self::AimCenterline => {
                targets(T::Retract, S::AimCenterline, P::AimCenterline, C::Retract)
            }
            Self::AutoAim => targets(T::Retract, S::AutoAim, P::AutoAim, C::Retract),
            Self::Shoot => targets(T::Retract, S::Shoot, P::AutoAim, C::Retract),
            Self::PlaceAmp => targets(T::Retract, S::RampDown, P::Amp, C::Retract),
            Self::AlignAmp => targets(T::Retract, S::Amp, P::Amp, C::Retract),
            Self::AlignClimb => targets(T::Retract, S::RampDown, P::PreClimb, C::Retract),
            Self::ClimbExtend => targets(T::Avoid, S::RampDown, P::Climb, C::Extend),
            Self::ClimbRetract => targets(T::Avoid, S::RampDown, P::Climb, C::Retract),
            Self::IntakeSource => targets(T::Retract, S::Intake, P::IntakeSource, C::Retract),
            Self::IntakeAndAim => targets(T::Intake, S::IntakeAndAim, P::Intake, C::Retract),
            Self::IntakeAndPivotAim => {
                targets(T::Intake, S::IntakeAndAim, P::AutoAim, C::Retract)
            }
            Self::IntakeAndShoot => targets(T::Intake, S::Shoot, P::AutoAim, C::Retract),
        }
    }
}

/// Per-cycle flags forwarded into the mechanism updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContext {
    /// Running under the autonomous sequencer (affects aim trim and shot
    /// gating).
    pub autonomous: bool,
    /// Operator shot/place confirmation this cycle.
    pub wants_place: bool,
}

/// Coordinates the five mechanism state machines under one high-level state.
pub struct SuperstructureStateMachine {
    state: SuperstructureState,
    trigger_intake: TriggerIntakeStateMachine,
    shooter: ShooterStateMachine,
    pivot: PivotStateMachine,
    climber: ClimberStateMachine,
    diverter: DiverterStateMachine,
}

impl SuperstructureStateMachine {
    pub fn new() -> Self {
        Self {
            state: SuperstructureState::Rest,
            trigger_intake: TriggerIntakeStateMachine::new(),
            shooter: ShooterStateMachine::new(),
            pivot: PivotStateMachine::new(),
            climber: ClimberStateMachine::new(),
            diverter: DiverterStateMachine::new(),
        }
    }

    /// Request a state change.
    ///
    /// Categorically unsafe combinations are refused outright, leaving the
    /// prior state in force: intaking cannot start while the climber is
    /// mid-retract (the robot is hanging on it). Everything finer-grained is
    /// handled by interlock clamps inside the mechanism updates.
    pub fn request(&mut self, state: SuperstructureState) {
        let intaking = matches!(
            state,
            SuperstructureState::IntakeFront | SuperstructureState::IntakeBack
        );
        if intaking && self.state == SuperstructureState::ClimbRetract {
            debug!(requested = ?state, "superstructure request refused while climbing");
            return;
        }
        if state != self.state {
            debug!(from = ?self.state, to = ?state, "superstructure state");
        }
        self.state = state;
    }

    #[inline]
    pub const fn state(&self) -> SuperstructureState {
        self.state
    }

    /// Push the mapped target into every mechanism, then run the mechanism
    /// updates in the documented order.
    ///
    /// One cross-cutting exception to the static table: while intaking-and-
    /// aiming with a piece already at the trigger, the pivot escalates to
    /// full auto-aim so the shot window opens as early as possible.
    pub fn update(
        &mut self,
        snap: &SensorSnapshot,
        interlocks: &InterlockPlanner,
        aim: &dyn AimSolution,
        shot_ready: bool,
        ctx: UpdateContext,
        commands: &mut MechanismCommands,
    ) {
        trace!(state = ?self.state, "superstructure update");
        let mapped = self.state.targets();

        self.trigger_intake.request(mapped.trigger_intake);
        self.shooter.request(mapped.shooter);
        self.pivot.request(mapped.pivot);
        self.climber.request(mapped.climber);
        self.diverter.request(mapped.diverter);

        if self.state == SuperstructureState::IntakeAndAim && snap.trigger_switch {
            self.pivot.request(PivotState::AutoAim);
        }

        // Intake family, then aim family, then climb family.
        self.trigger_intake.update(snap, interlocks, commands);
        self.shooter.update(snap, aim, shot_ready, commands);
        self.pivot
            .update(interlocks, aim, ctx.autonomous, ctx.wants_place, commands);
        self.climber.update(commands);
        self.diverter.update(interlocks, commands);
    }

    /// True while any mechanism is still converging on its setpoint.
    pub fn transitioning(&self, snap: &SensorSnapshot) -> bool {
        self.trigger_intake.transitioning(snap)
            || self.shooter.transitioning(snap)
            || self.pivot.transitioning(snap)
            || self.climber.transitioning(snap)
            || self.diverter.transitioning(snap)
    }

    pub const fn shooter_state(&self) -> ShooterState {
        self.shooter.state()
    }

    pub const fn pivot_state(&self) -> PivotState {
        self.pivot.state()
    }

    pub const fn trigger_intake_state(&self) -> TriggerIntakeState {
        self.trigger_intake.state()
    }

    pub const fn climber_state(&self) -> ClimberState {
        self.climber.state()
    }
}

impl Default for SuperstructureStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{snapshot_at, FixedAim};

    const ALL_STATES: [SuperstructureState; 20] = [
        SuperstructureState::Rest,
        SuperstructureState::Stow,
        SuperstructureState::IntakeFront,
        SuperstructureState::IntakeBack,
        SuperstructureState::AimLayup,
        SuperstructureState::AimProtected,
        SuperstructureState::AimUnderStage,
        SuperstructureState::AimWingline,
        SuperstructureState::AimCenterline,
        SuperstructureState::AutoAim,
        SuperstructureState::Shoot,
        SuperstructureState::PlaceAmp,
        SuperstructureState::AlignAmp,
        SuperstructureState::AlignClimb,
        SuperstructureState::ClimbExtend,
        SuperstructureState::ClimbRetract,
        SuperstructureState::IntakeSource,
        SuperstructureState::IntakeAndAim,
        SuperstructureState::IntakeAndPivotAim,
        SuperstructureState::IntakeAndShoot,
    ];

    #[test]
    fn mapping_is_total() {
        // The match in `targets()` is exhaustive, so this is mostly a guard
        // against a variant being added without a deliberate mapping choice:
        // every state must resolve to a target for every mechanism.
        for state in ALL_STATES {
            let _ = state.targets();
        }
    }

    #[test]
    fn rest_is_safe_idle_everywhere() {
        let t = SuperstructureState::Rest.targets();
        assert_eq!(t.trigger_intake, TriggerIntakeState::Retract);
        assert_eq!(t.shooter, ShooterState::RampDown);
        assert_eq!(t.pivot, PivotState::Rest);
        assert_eq!(t.climber, ClimberState::Retract);
        assert_eq!(t.diverter, DiverterState::Retract);
    }

    #[test]
    fn diverter_never_claimed_by_mapping() {
        for state in ALL_STATES {
            assert_eq!(state.targets().diverter, DiverterState::Retract, "{state:?}");
        }
    }

    #[test]
    fn climb_states_keep_intake_clear() {
        for state in [
            SuperstructureState::ClimbExtend,
            SuperstructureState::ClimbRetract,
        ] {
            assert_eq!(state.targets().trigger_intake, TriggerIntakeState::Avoid);
            assert_eq!(state.targets().pivot, PivotState::Climb);
        }
    }

    #[test]
    fn intake_refused_while_climb_retracting() {
        let mut sm = SuperstructureStateMachine::new();
        sm.request(SuperstructureState::ClimbExtend);
        sm.request(SuperstructureState::ClimbRetract);
        assert_eq!(sm.state(), SuperstructureState::ClimbRetract);

        sm.request(SuperstructureState::IntakeBack);
        assert_eq!(sm.state(), SuperstructureState::ClimbRetract);
        sm.request(SuperstructureState::IntakeFront);
        assert_eq!(sm.state(), SuperstructureState::ClimbRetract);

        // Non-intake requests still go through.
        sm.request(SuperstructureState::Rest);
        assert_eq!(sm.state(), SuperstructureState::Rest);
    }

    #[test]
    fn intake_and_aim_escalates_pivot_on_trigger_switch() {
        let mut sm = SuperstructureStateMachine::new();
        let mut cmds = MechanismCommands::default();
        let mut snap = snapshot_at(45.0, 100.0);
        let planner = InterlockPlanner::new();

        sm.request(SuperstructureState::IntakeAndAim);
        sm.update(
            &snap,
            &planner,
            &FixedAim::default(),
            false,
            UpdateContext::default(),
            &mut cmds,
        );
        assert_eq!(sm.pivot_state(), PivotState::Intake);

        snap.trigger_switch = true;
        sm.request(SuperstructureState::IntakeAndAim);
        sm.update(
            &snap,
            &planner,
            &FixedAim::default(),
            false,
            UpdateContext::default(),
            &mut cmds,
        );
        assert_eq!(sm.pivot_state(), PivotState::AutoAim);
    }

    #[test]
    fn transitioning_is_or_of_mechanisms() {
        let mut sm = SuperstructureStateMachine::new();
        let mut cmds = MechanismCommands::default();
        let mut planner = InterlockPlanner::new();

        let mut snap = snapshot_at(33.0, 0.0);
        snap.flywheel_velocity = Some(0.0);
        snap.climber_extension = Some(0.0);
        snap.diverter_extension = Some(0.0);
        planner.update(&snap);

        sm.update(
            &snap,
            &planner,
            &FixedAim::default(),
            false,
            UpdateContext::default(),
            &mut cmds,
        );
        // Everything already at the Rest setpoints: not transitioning.
        assert!(!sm.transitioning(&snap));

        // Any stale sensor flips the aggregate back to transitioning.
        let mut stale = snap;
        stale.climber_extension = None;
        assert!(sm.transitioning(&stale));
    }
}
