//! Safety module root.
//!
//! Cross-mechanism collision predicates, recomputed once per cycle and
//! shared read-only by every mechanism update in that cycle.

pub mod interlock;
