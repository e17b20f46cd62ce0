//! Aliquot sequences: repeated application of s(n) = sigma(n) - n.
//!
//! Starting from n, the engine records the trajectory n, s(n), s(s(n)), ...
//! and stops at the first of:
//! - reaching 0 (a terminating sequence),
//! - revisiting a value (a perfect number, amicable pair or sociable chain),
//! - exceeding the caller's bounds on length, term size, or sieve ceiling.
//!
//! Bound violations are ordinary outcomes reported in [`AliquotState`], not
//! errors, so a caller can inspect the trajectory and retry with looser
//! bounds. Only invalid input and `u64` overflow come back as `Err`.

pub mod bounds;
pub mod engine;
pub mod outcome;
pub mod survey;

pub use bounds::{AliquotBounds, BoundsError};
pub use engine::{AliquotEngine, AliquotSequence};
pub use outcome::{AliquotReport, AliquotState, CycleKind};
pub use survey::{survey, CycleRecord, SurveySummary};
