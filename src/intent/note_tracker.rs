//! Game-piece location tracking.
//!
//! The aiming automation must not spin up for a shot that cannot happen, so
//! it asks this tracker whether a piece is actually held in the shooter.
//! The tracker folds the superstructure's active state together with the
//! piece switches: a switch tripping only counts as acquisition while an
//! intake state is active, which keeps a passing hand or a bounced piece
//! from arming the automation.

use tracing::debug;

use crate::hw::SensorSnapshot;
use crate::state::superstructure::SuperstructureState;

/// Where the tracked piece currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceLocation {
    /// No piece on board (or we lost track of it).
    #[default]
    None,
    /// Held in the shooter, ready to aim and fire.
    Shooter,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoteTracker {
    location: PieceLocation,
}

impl NoteTracker {
    pub const fn new() -> Self {
        Self {
            location: PieceLocation::None,
        }
    }

    #[inline]
    pub const fn location(&self) -> PieceLocation {
        self.location
    }

    /// Fold this cycle's state and switches into the tracked location.
    /// Runs after the mechanism updates so it sees the applied state.
    pub fn update(&mut self, state: SuperstructureState, snap: &SensorSnapshot, ejecting: bool) {
        let next = if ejecting || snap.shot_detected {
            PieceLocation::None
        } else if Self::is_intaking(state) && (snap.flywheel_switch || snap.trigger_switch) {
            PieceLocation::Shooter
        } else {
            self.location
        };

        if next != self.location {
            debug!(from = ?self.location, to = ?next, "piece location");
        }
        self.location = next;
    }

    const fn is_intaking(state: SuperstructureState) -> bool {
        matches!(
            state,
            SuperstructureState::IntakeFront
                | SuperstructureState::IntakeBack
                | SuperstructureState::IntakeSource
                | SuperstructureState::IntakeAndAim
                | SuperstructureState::IntakeAndPivotAim
                | SuperstructureState::IntakeAndShoot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquires_only_while_intaking() {
        let mut tracker = NoteTracker::new();
        let mut snap = SensorSnapshot::default();
        snap.trigger_switch = true;

        // Switch tripped at rest: no acquisition.
        tracker.update(SuperstructureState::Rest, &snap, false);
        assert_eq!(tracker.location(), PieceLocation::None);

        tracker.update(SuperstructureState::IntakeBack, &snap, false);
        assert_eq!(tracker.location(), PieceLocation::Shooter);
    }

    #[test]
    fn holds_location_across_states() {
        let mut tracker = NoteTracker::new();
        let mut snap = SensorSnapshot::default();
        snap.flywheel_switch = true;
        tracker.update(SuperstructureState::IntakeBack, &snap, false);

        // Switches release while aiming; the piece is still on board.
        let quiet = SensorSnapshot::default();
        tracker.update(SuperstructureState::AutoAim, &quiet, false);
        assert_eq!(tracker.location(), PieceLocation::Shooter);
    }

    #[test]
    fn shot_clears_location() {
        let mut tracker = NoteTracker::new();
        let mut snap = SensorSnapshot::default();
        snap.trigger_switch = true;
        tracker.update(SuperstructureState::IntakeBack, &snap, false);

        let mut shot = SensorSnapshot::default();
        shot.shot_detected = true;
        tracker.update(SuperstructureState::Shoot, &shot, false);
        assert_eq!(tracker.location(), PieceLocation::None);
    }

    #[test]
    fn eject_clears_location() {
        let mut tracker = NoteTracker::new();
        let mut snap = SensorSnapshot::default();
        snap.trigger_switch = true;
        tracker.update(SuperstructureState::IntakeBack, &snap, false);

        tracker.update(SuperstructureState::Rest, &SensorSnapshot::default(), true);
        assert_eq!(tracker.location(), PieceLocation::None);
    }
}
