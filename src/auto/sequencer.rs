//! Timed autonomous sequencer.
//!
//! A [`Routine`] is a flat list of [`Action`]s executed strictly in order.
//! Each action pins one superstructure state and one drive mode for a fixed
//! timeout, optionally with a path to follow and an early-exit predicate.
//! The sequencer never blocks: it is stepped once per cycle and re-pushes its
//! requests every time, so a dropped cycle loses nothing.

use tracing::{debug, info};

use crate::hw::{DriveMode, Drivetrain, PathHandle, SensorSnapshot};
use crate::state::superstructure::{SuperstructureState, SuperstructureStateMachine};

/// One step of an autonomous routine.
///
/// Advancement is purely timed (`timeout_s` elapsed) or predicate-driven
/// (`early_exit` returns true), whichever comes first. The final action of a
/// routine never advances; it holds until the mode ends.
#[derive(Clone, Copy)]
pub struct Action {
    pub state: SuperstructureState,
    pub drive_mode: DriveMode,
    pub path: Option<PathHandle>,
    pub timeout_s: f64,
    pub early_exit: fn(&SensorSnapshot) -> bool,
}

const fn never(_: &SensorSnapshot) -> bool {
    false
}

impl Action {
    /// Hold a superstructure state in place for `timeout_s`.
    ///
    /// Shooting states get the aim drive mode so the heading keeps tracking;
    /// everything else locks the wheels.
    pub const fn hold(state: SuperstructureState, timeout_s: f64) -> Self {
        let drive_mode = match state {
            SuperstructureState::AutoAim
            | SuperstructureState::Shoot
            | SuperstructureState::IntakeAndAim
            | SuperstructureState::IntakeAndShoot => DriveMode::Aim,
            _ => DriveMode::LockIn,
        };
        Self {
            state,
            drive_mode,
            path: None,
            timeout_s,
            early_exit: never,
        }
    }

    /// Hold a superstructure state while following a path. The timeout is
    /// the path's nominal duration; the action also ends as soon as the
    /// follower reports the path finished.
    pub const fn with_path(state: SuperstructureState, path: PathHandle) -> Self {
        Self {
            state,
            drive_mode: DriveMode::FollowPath,
            path: Some(path),
            timeout_s: path.duration_s,
            early_exit: |snap| snap.path_finished,
        }
    }

    /// Sit at rest for `timeout_s`.
    pub const fn wait(timeout_s: f64) -> Self {
        Self::hold(SuperstructureState::Rest, timeout_s)
    }

    /// Attach an early-exit predicate to this action.
    pub const fn until(mut self, early_exit: fn(&SensorSnapshot) -> bool) -> Self {
        self.early_exit = early_exit;
        self
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("state", &self.state)
            .field("drive_mode", &self.drive_mode)
            .field("path", &self.path.map(|p| p.name))
            .field("timeout_s", &self.timeout_s)
            .finish()
    }
}

/// A named, ordered list of actions plus the cursor state to execute them.
pub struct Routine {
    name: &'static str,
    actions: Vec<Action>,
    cursor: usize,
    elapsed: f64,
}

impl Routine {
    pub fn new(name: &'static str, actions: Vec<Action>) -> Self {
        Self {
            name,
            actions,
            cursor: 0,
            elapsed: 0.0,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current action, or `None` for an empty routine.
    pub fn current(&self) -> Option<&Action> {
        self.actions.get(self.cursor)
    }

    /// The full action list, in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Rewind to the first action. Called whenever the robot leaves
    /// autonomous, so re-enabling replays the routine from the start.
    pub fn reset(&mut self) {
        if self.cursor != 0 || self.elapsed != 0.0 {
            debug!(routine = self.name, "routine reset");
        }
        self.cursor = 0;
        self.elapsed = 0.0;
    }

    /// Step the routine by one cycle: advance the cursor if the current
    /// action is done, then re-push the active action's requests.
    pub fn run(
        &mut self,
        dt: f64,
        snap: &SensorSnapshot,
        superstructure: &mut SuperstructureStateMachine,
        drivetrain: &mut dyn Drivetrain,
    ) {
        if self.actions.is_empty() {
            return;
        }

        self.elapsed += dt;
        let last = self.cursor + 1 >= self.actions.len();
        let action = &self.actions[self.cursor];
        let done = self.elapsed >= action.timeout_s || (action.early_exit)(snap);
        if done && !last {
            self.cursor += 1;
            self.elapsed = 0.0;
            info!(
                routine = self.name,
                step = self.cursor,
                state = ?self.actions[self.cursor].state,
                "auto step"
            );
        }

        let action = self.actions[self.cursor];
        superstructure.request(action.state);
        drivetrain.request_mode(action.drive_mode);
        if let Some(path) = action.path {
            // Re-issued every cycle; the follower treats a repeat of the
            // active handle as a no-op.
            drivetrain.start_path(path);
        }
    }
}

impl std::fmt::Debug for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Routine")
            .field("name", &self.name)
            .field("steps", &self.actions.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
