//! Cross-mechanism interlock predicates.
//!
//! The pivot and the trigger intake share a swing volume, and the diverter
//! can only leave the frame once the pivot is clear of it. Each predicate is
//! a pure function of the latest sensor snapshot; there is no hysteresis
//! beyond the threshold comparisons themselves.
//!
//! `update()` runs exactly once per cycle, before any mechanism update, so
//! every consumer in that cycle sees the same snapshot. A stale reading
//! resolves every predicate to its restrictive value.

use crate::hw::SensorSnapshot;

/// Pivot angles inside this band clear the trigger intake's swing [deg].
pub const INTERFERENCE_LOWER_PIVOT_DEG: f64 = 30.0;
pub const INTERFERENCE_UPPER_PIVOT_DEG: f64 = 60.0;

/// Max trigger intake deployment at which the pivot may flatten [deg].
pub const MAX_INTAKE_DEPLOY_TO_FLATTEN_DEG: f64 = 0.0;

/// Min pivot angle at which the diverter may extend [deg].
pub const MIN_PIVOT_FOR_DIVERTER_DEG: f64 = 90.0;

/// Min trigger intake deployment at which the pivot may flip past vertical [deg].
pub const MIN_INTAKE_DEPLOY_TO_FLIP_DEG: f64 = 20.0;

/// Per-cycle interlock predicate set.
///
/// Constructed once at startup; `update()` recomputes every predicate from
/// scratch each cycle (no history is kept).
#[derive(Debug, Clone, Copy, Default)]
pub struct InterlockPlanner {
    can_flatten_pivot: bool,
    trigger_intake_must_avoid: bool,
    can_extend_diverter: bool,
    can_flip_pivot: bool,
}

impl InterlockPlanner {
    pub const fn new() -> Self {
        // All-restrictive until the first update.
        Self {
            can_flatten_pivot: false,
            trigger_intake_must_avoid: true,
            can_extend_diverter: false,
            can_flip_pivot: false,
        }
    }

    /// Recompute all predicates from the current snapshot.
    pub fn update(&mut self, snap: &SensorSnapshot) {
        match snap.intake_deploy_angle {
            Some(deploy) => {
                self.can_flatten_pivot = deploy <= MAX_INTAKE_DEPLOY_TO_FLATTEN_DEG;
                self.can_flip_pivot = deploy > MIN_INTAKE_DEPLOY_TO_FLIP_DEG;
            }
            None => {
                self.can_flatten_pivot = false;
                self.can_flip_pivot = false;
            }
        }

        match snap.pivot_angle {
            Some(pivot) => {
                self.trigger_intake_must_avoid = pivot < INTERFERENCE_LOWER_PIVOT_DEG
                    || pivot > INTERFERENCE_UPPER_PIVOT_DEG;
                self.can_extend_diverter = pivot > MIN_PIVOT_FOR_DIVERTER_DEG;
            }
            None => {
                self.trigger_intake_must_avoid = true;
                self.can_extend_diverter = false;
            }
        }
    }

    /// The pivot may drop below the intake's stowed envelope.
    #[inline]
    pub const fn can_flatten_pivot(&self) -> bool {
        self.can_flatten_pivot
    }

    /// The trigger intake must hold its avoidance pose because the pivot
    /// occupies the shared swing volume.
    #[inline]
    pub const fn trigger_intake_must_avoid(&self) -> bool {
        self.trigger_intake_must_avoid
    }

    /// The diverter may extend past the frame.
    #[inline]
    pub const fn can_extend_diverter(&self) -> bool {
        self.can_extend_diverter
    }

    /// The pivot may swing past its upright collision threshold.
    #[inline]
    pub const fn can_flip_pivot(&self) -> bool {
        self.can_flip_pivot
    }
}
