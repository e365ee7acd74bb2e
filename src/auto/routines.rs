//! The autonomous routine catalog.
//!
//! Every routine is assembled from a handful of building blocks: a spin-up
//! plus release pair for shooting, an intake-while-driving leg per staged
//! piece, and a long terminal hold so the superstructure sits still through
//! the end of the period.

use crate::hw::PathHandle;
use crate::state::superstructure::SuperstructureState;

use super::sequencer::{Action, Routine};

// ─── Path handles ───────────────────────────────────────────────────
//
// Names match the pre-generated trajectory files; durations are the
// nominal trajectory times and double as the action timeouts.

pub const START1_WING1: PathHandle = PathHandle {
    name: "start1-wing1",
    duration_s: 2.0,
};
pub const START2_WING2: PathHandle = PathHandle {
    name: "start2-wing2",
    duration_s: 1.5,
};
pub const START3_WING3: PathHandle = PathHandle {
    name: "start3-wing3",
    duration_s: 2.0,
};
pub const WING1_WING2: PathHandle = PathHandle {
    name: "wing1-wing2",
    duration_s: 1.8,
};
pub const WING2_WING3: PathHandle = PathHandle {
    name: "wing2-wing3",
    duration_s: 1.8,
};
pub const WING2_CENTER3: PathHandle = PathHandle {
    name: "wing2-center3",
    duration_s: 2.6,
};
pub const CENTER3_WING2: PathHandle = PathHandle {
    name: "center3-wing2",
    duration_s: 2.6,
};

/// Spin up on the solver, then release. The spin-up window is generous
/// enough to cover a pivot swing from the intake angle.
fn shoot() -> [Action; 2] {
    [
        Action::hold(SuperstructureState::AutoAim, 1.25),
        Action::hold(SuperstructureState::Shoot, 0.15),
    ]
}

/// Drive a path with the rear intake running and the flywheels pre-spun.
fn intake_and_follow(path: PathHandle) -> Action {
    Action::with_path(SuperstructureState::IntakeAndAim, path)
}

/// Drive a path with the superstructure at rest. Used for the return leg
/// from the center line, where the piece is already staged and the shot
/// happens after the robot is back in range.
fn follow(path: PathHandle) -> Action {
    Action::with_path(SuperstructureState::Rest, path)
}

/// Sit at rest for a configurable delay (partner coordination).
fn wait_for(seconds: f64) -> Action {
    Action::wait(seconds)
}

/// Terminal hold: rest until the period ends. Long enough to outlast any
/// autonomous period; the sequencer never advances past the last action
/// anyway.
fn end() -> Action {
    Action::wait(15.0)
}

/// Sit still for the whole period.
pub fn do_nothing() -> Routine {
    Routine::new("do-nothing", vec![end()])
}

/// Score the preload on the solver, then hold.
pub fn shoot_only() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(end());
    Routine::new("shoot-only", actions)
}

/// Score the preload point-blank without the solver. Exits the release
/// step as soon as the shot is detected.
pub fn layup_only() -> Routine {
    Routine::new(
        "layup-only",
        vec![
            Action::hold(SuperstructureState::AimLayup, 1.25),
            Action::hold(SuperstructureState::Shoot, 1.0).until(|s| s.shot_detected),
            end(),
        ],
    )
}

/// Preload plus the center wing piece, starting from the middle position.
pub fn two_note_center() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(intake_and_follow(START2_WING2));
    actions.extend(shoot());
    actions.push(end());
    Routine::new("two-note-center", actions)
}

/// Preload plus the amp-side wing piece.
pub fn two_note_amp_side() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(intake_and_follow(START1_WING1));
    actions.extend(shoot());
    actions.push(end());
    Routine::new("two-note-amp-side", actions)
}

/// Preload plus the stage-side wing piece, with a short delay before
/// moving to stay clear of a center-starting partner.
pub fn two_note_stage_side() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(wait_for(0.5));
    actions.push(intake_and_follow(START3_WING3));
    actions.extend(shoot());
    actions.push(end());
    Routine::new("two-note-stage-side", actions)
}

/// Preload, the center wing piece, then the middle center-line piece.
/// The center-line leg is out of solver range, so the robot carries the
/// piece back to the wing before shooting.
pub fn three_note_center() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(intake_and_follow(START2_WING2));
    actions.extend(shoot());
    actions.push(intake_and_follow(WING2_CENTER3));
    actions.push(follow(CENTER3_WING2));
    actions.extend(shoot());
    actions.push(end());
    Routine::new("three-note-center", actions)
}

/// Preload plus all three wing pieces, sweeping amp side to stage side.
pub fn four_note() -> Routine {
    let mut actions = Vec::new();
    actions.extend(shoot());
    actions.push(intake_and_follow(START1_WING1));
    actions.extend(shoot());
    actions.push(intake_and_follow(WING1_WING2));
    actions.extend(shoot());
    actions.push(intake_and_follow(WING2_WING3));
    actions.extend(shoot());
    actions.push(end());
    Routine::new("four-note", actions)
}

/// Look up a routine by its catalog name.
pub fn by_name(name: &str) -> Option<Routine> {
    match name {
        "do-nothing" => Some(do_nothing()),
        "shoot-only" => Some(shoot_only()),
        "layup-only" => Some(layup_only()),
        "two-note-center" => Some(two_note_center()),
        "two-note-amp-side" => Some(two_note_amp_side()),
        "two-note-stage-side" => Some(two_note_stage_side()),
        "three-note-center" => Some(three_note_center()),
        "four-note" => Some(four_note()),
        _ => None,
    }
}

/// Catalog names, for CLI help and validation messages.
pub const NAMES: [&str; 8] = [
    "do-nothing",
    "shoot-only",
    "layup-only",
    "two-note-center",
    "two-note-amp-side",
    "two-note-stage-side",
    "three-note-center",
    "four-note",
];
