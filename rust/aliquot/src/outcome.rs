//! Terminal states and reports of aliquot runs.

use std::fmt;

use arith_core::GrowthEvent;
use serde::{Deserialize, Serialize};

/// State of a sequence computation. Every state but `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AliquotState {
    Running,
    /// The sequence reached 0.
    Terminated,
    /// The next term repeats an earlier one.
    Cycle {
        period: usize,
        /// Smallest member of the cycle.
        representative: u64,
    },
    LengthExceeded,
    ValueExceeded,
    PrimeBoundExceeded { requested: u64, ceiling: u64 },
}

/// Name of a cycle by its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CycleKind {
    Perfect,
    Amicable,
    Sociable(usize),
}

impl CycleKind {
    pub fn from_period(period: usize) -> Self {
        match period {
            1 => CycleKind::Perfect,
            2 => CycleKind::Amicable,
            k => CycleKind::Sociable(k),
        }
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::Perfect => write!(f, "perfect"),
            CycleKind::Amicable => write!(f, "amicable"),
            CycleKind::Sociable(k) => write!(f, "sociable (period {})", k),
        }
    }
}

impl AliquotState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AliquotState::Running)
    }

    /// Whether the run stopped on a ceiling rather than on its own.
    pub fn is_bound_exceeded(&self) -> bool {
        matches!(
            self,
            AliquotState::LengthExceeded
                | AliquotState::ValueExceeded
                | AliquotState::PrimeBoundExceeded { .. }
        )
    }

    pub fn cycle_kind(&self) -> Option<CycleKind> {
        match self {
            AliquotState::Cycle { period, .. } => Some(CycleKind::from_period(*period)),
            _ => None,
        }
    }
}

impl fmt::Display for AliquotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliquotState::Running => write!(f, "running"),
            AliquotState::Terminated => write!(f, "terminating"),
            AliquotState::Cycle {
                period,
                representative,
            } => write!(
                f,
                "periodic: {} with representative {}",
                CycleKind::from_period(*period),
                representative
            ),
            AliquotState::LengthExceeded => write!(f, "length exceeded"),
            AliquotState::ValueExceeded => write!(f, "value exceeded"),
            AliquotState::PrimeBoundExceeded { requested, ceiling } => write!(
                f,
                "prime bound exceeded (needed {}, ceiling {})",
                requested, ceiling
            ),
        }
    }
}

/// Result of one run: the trajectory, how it ended, and the sieve growth it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliquotReport {
    pub start: u64,
    /// The starting value followed by each successor. A cycle's closing
    /// repeat is not appended.
    pub trajectory: Vec<u64>,
    pub state: AliquotState,
    pub growth: Vec<GrowthEvent>,
}

impl AliquotReport {
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    /// Index and value of the largest term (first occurrence).
    pub fn peak(&self) -> Option<(usize, u64)> {
        self.trajectory
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
    }

    /// The members of the cycle, in the order they occur.
    pub fn cycle(&self) -> Option<&[u64]> {
        match self.state {
            AliquotState::Cycle { period, .. } => {
                Some(&self.trajectory[self.trajectory.len() - period..])
            }
            _ => None,
        }
    }

    /// The trajectory continued to `length` terms: zeros after a terminating
    /// sequence, further laps around a cycle. `None` when the run stopped on
    /// a bound, since its continuation is unknown. Never truncates.
    pub fn padded(&self, length: usize) -> Option<Vec<u64>> {
        let mut terms = self.trajectory.clone();
        match self.state {
            AliquotState::Terminated => terms.resize(length.max(terms.len()), 0),
            AliquotState::Cycle { period, .. } => {
                while terms.len() < length {
                    terms.push(terms[terms.len() - period]);
                }
            }
            _ => return None,
        }
        Some(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(trajectory: Vec<u64>, state: AliquotState) -> AliquotReport {
        AliquotReport {
            start: trajectory[0],
            trajectory,
            state,
            growth: Vec::new(),
        }
    }

    #[test]
    fn test_cycle_kinds() {
        assert_eq!(CycleKind::from_period(1), CycleKind::Perfect);
        assert_eq!(CycleKind::from_period(2), CycleKind::Amicable);
        assert_eq!(CycleKind::from_period(4), CycleKind::Sociable(4));
        assert_eq!(CycleKind::Sociable(5).to_string(), "sociable (period 5)");
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!AliquotState::Running.is_terminal());
        assert!(AliquotState::Terminated.is_terminal());
        assert!(!AliquotState::Terminated.is_bound_exceeded());
        assert!(AliquotState::ValueExceeded.is_bound_exceeded());
        assert!(AliquotState::PrimeBoundExceeded {
            requested: 11,
            ceiling: 10
        }
        .is_bound_exceeded());
        assert_eq!(
            AliquotState::Cycle {
                period: 2,
                representative: 220
            }
            .cycle_kind(),
            Some(CycleKind::Amicable)
        );
        assert_eq!(AliquotState::LengthExceeded.cycle_kind(), None);
    }

    #[test]
    fn test_peak_prefers_first_occurrence() {
        let r = report(vec![10, 8, 7, 1, 0], AliquotState::Terminated);
        assert_eq!(r.peak(), Some((0, 10)));
        let r = report(vec![4, 9, 9, 2], AliquotState::LengthExceeded);
        assert_eq!(r.peak(), Some((1, 9)));
    }

    #[test]
    fn test_padding_terminating() {
        let r = report(vec![10, 8, 7, 1, 0], AliquotState::Terminated);
        assert_eq!(r.padded(8).unwrap(), vec![10, 8, 7, 1, 0, 0, 0, 0]);
        assert_eq!(r.padded(3).unwrap(), vec![10, 8, 7, 1, 0]);
    }

    #[test]
    fn test_padding_periodic() {
        let r = report(
            vec![25, 6],
            AliquotState::Cycle {
                period: 1,
                representative: 6,
            },
        );
        assert_eq!(r.padded(5).unwrap(), vec![25, 6, 6, 6, 6]);

        let r = report(
            vec![284, 220],
            AliquotState::Cycle {
                period: 2,
                representative: 220,
            },
        );
        assert_eq!(r.cycle().unwrap(), &[284, 220]);
        assert_eq!(r.padded(5).unwrap(), vec![284, 220, 284, 220, 284]);
    }

    #[test]
    fn test_padding_refused_after_bound() {
        let r = report(vec![276, 396, 696], AliquotState::LengthExceeded);
        assert_eq!(r.padded(10), None);
        assert_eq!(r.cycle(), None);
    }

    #[test]
    fn test_state_serialization() {
        let state = AliquotState::Cycle {
            period: 4,
            representative: 1_264_460,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"Cycle":{"period":4,"representative":1264460}}"#);
        let back: AliquotState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
        assert_eq!(
            serde_json::to_string(&AliquotState::Terminated).unwrap(),
            r#""Terminated""#
        );
    }
}
