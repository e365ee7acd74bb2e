//! Per-cycle orchestration: read → resolve → update → override → write.
//!
//! The [`Orchestrator`] owns every stateful piece of the coordination layer
//! and steps them in a fixed order once per cycle. The caller owns the loop
//! pacing and hardware I/O; this module is pure coordination and never
//! blocks, sleeps, or allocates in the cycle path.

use tracing::{debug, trace};

use crate::auto::sequencer::Routine;
use crate::config::KestrelConfig;
use crate::hw::{AimSolution, Drivetrain, IntentSource, MechanismCommands, SensorSnapshot};
use crate::intent::note_tracker::NoteTracker;
use crate::intent::resolver::IntentResolver;
use crate::safety::interlock::InterlockPlanner;
use crate::state::superstructure::{SuperstructureStateMachine, UpdateContext};

/// Robot control authority, as reported by the field/driver station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RobotMode {
    #[default]
    Disabled,
    Teleop,
    Autonomous,
}

/// O(1) per-cycle counters, updated with no allocation.
#[derive(Debug, Clone, Copy)]
pub struct CycleStats {
    /// Total cycles executed (including disabled cycles).
    pub cycle_count: u64,
    /// Cycles spent in each mode.
    pub disabled_cycles: u64,
    pub teleop_cycles: u64,
    pub autonomous_cycles: u64,
    /// Cycles in which the superstructure was still converging.
    pub transitioning_cycles: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            disabled_cycles: 0,
            teleop_cycles: 0,
            autonomous_cycles: 0,
            transitioning_cycles: 0,
        }
    }

    #[inline]
    fn record(&mut self, mode: RobotMode, transitioning: bool) {
        self.cycle_count += 1;
        match mode {
            RobotMode::Disabled => self.disabled_cycles += 1,
            RobotMode::Teleop => self.teleop_cycles += 1,
            RobotMode::Autonomous => self.autonomous_cycles += 1,
        }
        if transitioning {
            self.transitioning_cycles += 1;
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns and sequences the whole coordination layer.
pub struct Orchestrator {
    superstructure: SuperstructureStateMachine,
    interlocks: InterlockPlanner,
    resolver: IntentResolver,
    tracker: NoteTracker,
    routine: Option<Routine>,
    aim: Box<dyn AimSolution>,
    drivetrain: Box<dyn Drivetrain>,
    commands: MechanismCommands,
    prev_mode: RobotMode,
    stats: CycleStats,
}

impl Orchestrator {
    pub fn new(
        config: &KestrelConfig,
        intent: Box<dyn IntentSource>,
        aim: Box<dyn AimSolution>,
        drivetrain: Box<dyn Drivetrain>,
    ) -> Self {
        Self {
            superstructure: SuperstructureStateMachine::new(),
            interlocks: InterlockPlanner::new(),
            resolver: IntentResolver::new(intent, config),
            tracker: NoteTracker::new(),
            routine: None,
            aim,
            drivetrain,
            commands: MechanismCommands::default(),
            prev_mode: RobotMode::Disabled,
            stats: CycleStats::new(),
        }
    }

    /// Select the routine to run the next time autonomous starts. Replaces
    /// any prior selection; `None` means sit disabled-still in autonomous.
    pub fn select_routine(&mut self, routine: Option<Routine>) {
        if let Some(r) = &routine {
            debug!(routine = r.name(), "routine selected");
        }
        self.routine = routine;
    }

    #[inline]
    pub const fn stats(&self) -> &CycleStats {
        &self.stats
    }

    #[inline]
    pub const fn superstructure(&self) -> &SuperstructureStateMachine {
        &self.superstructure
    }

    #[inline]
    pub const fn interlocks(&self) -> &InterlockPlanner {
        &self.interlocks
    }

    pub const fn tracker(&self) -> &NoteTracker {
        &self.tracker
    }

    /// Run one coordination cycle and return the commands to send.
    ///
    /// `dt` is the elapsed time since the previous call [s]. The fixed
    /// order within a cycle: interlocks from the fresh snapshot, intent or
    /// sequencer requests, mechanism updates, operator overrides last so
    /// they win over everything, then piece tracking from the final
    /// command picture.
    pub fn run_cycle(
        &mut self,
        mode: RobotMode,
        snap: &SensorSnapshot,
        dt: f64,
    ) -> MechanismCommands {
        trace!(?mode, dt, "cycle");

        // Leaving autonomous rewinds the routine so a re-enable replays it.
        if mode != RobotMode::Autonomous
            && let Some(routine) = &mut self.routine
        {
            routine.reset();
        }

        if mode == RobotMode::Disabled {
            if self.prev_mode != RobotMode::Disabled {
                self.drivetrain.cancel_path();
            }
            self.prev_mode = mode;
            self.stats.record(mode, false);
            // Safe idle; the caller must not actuate from a disabled cycle.
            self.commands = MechanismCommands::default();
            return self.commands;
        }

        self.interlocks.update(snap);
        self.commands = MechanismCommands::default();

        let mut ejecting = false;
        match mode {
            RobotMode::Teleop => {
                let piece = self.tracker.location();
                let wanted = self.resolver.wanted_state(snap, piece, dt);
                self.superstructure.request(wanted);
                self.drivetrain.request_mode(self.resolver.wanted_drive_mode());

                let ctx = UpdateContext {
                    autonomous: false,
                    wants_place: self.resolver.wants_place(),
                };
                let shot_ready = self.resolver.wants_place() || self.aim.shot_ready();
                self.superstructure.update(
                    snap,
                    &self.interlocks,
                    self.aim.as_ref(),
                    shot_ready,
                    ctx,
                    &mut self.commands,
                );
                ejecting = self.resolver.handle_overrides(&mut self.commands);
            }
            RobotMode::Autonomous => {
                if let Some(routine) = &mut self.routine {
                    routine.run(dt, snap, &mut self.superstructure, self.drivetrain.as_mut());
                }
                let ctx = UpdateContext {
                    autonomous: true,
                    wants_place: false,
                };
                // No operator in the loop: the shot gate is held open and
                // release timing comes from the routine's action windows.
                self.superstructure.update(
                    snap,
                    &self.interlocks,
                    self.aim.as_ref(),
                    true,
                    ctx,
                    &mut self.commands,
                );
            }
            RobotMode::Disabled => unreachable!("handled above"),
        }

        self.tracker
            .update(self.superstructure.state(), snap, ejecting);

        let transitioning = self.superstructure.transitioning(snap);
        self.stats.record(mode, transitioning);
        self.prev_mode = mode;
        self.commands
    }
}
