//! The aliquot state machine.

use std::collections::HashMap;

use arith_core::{ArithError, GrowthEvent, PrimeRegistry};
use multiplicative::{aliquot_sum, sum_of_divisors, Multiplicative};

use crate::bounds::{AliquotBounds, BoundsError};
use crate::outcome::{AliquotReport, AliquotState};

/// Drives aliquot sequences over a caller-owned prime registry.
///
/// Several runs may share one registry in turn; it only ever grows, so later
/// runs reuse the primes sieved by earlier ones.
pub struct AliquotEngine<'r> {
    registry: &'r mut PrimeRegistry,
    sigma: Multiplicative<u64>,
}

impl<'r> AliquotEngine<'r> {
    pub fn new(registry: &'r mut PrimeRegistry) -> Self {
        Self {
            registry,
            sigma: sum_of_divisors(),
        }
    }

    pub fn registry(&self) -> &PrimeRegistry {
        self.registry
    }

    /// Run the sequence from `start` until it reaches a terminal state.
    ///
    /// Bound violations end the run with the corresponding state; `Err` is
    /// reserved for a zero start, zero bounds, and `u64` overflow.
    pub fn run(&mut self, start: u64, bounds: &AliquotBounds) -> Result<AliquotReport, ArithError> {
        let mut sequence = self.sequence(start, bounds)?;
        while !sequence.step()?.is_terminal() {}
        Ok(sequence.finish())
    }

    /// Begin a sequence to be advanced one step at a time.
    ///
    /// For the lifetime of the returned sequence the registry ceiling is
    /// lowered to `bounds.max_prime` (never raised); it is restored on drop.
    pub fn sequence(
        &mut self,
        start: u64,
        bounds: &AliquotBounds,
    ) -> Result<AliquotSequence<'_>, ArithError> {
        if start == 0 {
            return Err(ArithError::Domain {
                function: "aliquot sequence",
                value: 0,
            });
        }
        if let Err(BoundsError::Invalid(name)) = bounds.validate() {
            return Err(ArithError::Domain {
                function: name,
                value: 0,
            });
        }

        let stale = self.registry.drain_growth_events();
        if !stale.is_empty() {
            log::debug!(
                "discarding {} growth events recorded before the run of {}",
                stale.len(),
                start
            );
        }
        let ceiling = self.registry.ceiling().min(bounds.max_prime);
        let saved_ceiling = self.registry.replace_ceiling(ceiling);

        Ok(AliquotSequence {
            registry: &mut *self.registry,
            sigma: &self.sigma,
            bounds: *bounds,
            saved_ceiling,
            current: start,
            trajectory: vec![start],
            seen: HashMap::from([(start, 0)]),
            growth: Vec::new(),
            state: AliquotState::Running,
        })
    }
}

/// One aliquot sequence in progress.
pub struct AliquotSequence<'a> {
    registry: &'a mut PrimeRegistry,
    sigma: &'a Multiplicative<u64>,
    bounds: AliquotBounds,
    saved_ceiling: u64,
    current: u64,
    trajectory: Vec<u64>,
    /// Index of every value in the trajectory.
    seen: HashMap<u64, usize>,
    growth: Vec<GrowthEvent>,
    state: AliquotState,
}

impl AliquotSequence<'_> {
    pub fn state(&self) -> AliquotState {
        self.state
    }

    pub fn trajectory(&self) -> &[u64] {
        &self.trajectory
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Advance by one term. A no-op once the state is terminal.
    ///
    /// The checks run in a fixed order: 0, repetition, length, value. Each
    /// ceiling is checked before the next sigma evaluation could sieve.
    pub fn step(&mut self) -> Result<AliquotState, ArithError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        let result = aliquot_sum(self.sigma, self.registry, self.current);
        self.collect_growth();
        let next = match result {
            Ok(next) => next,
            Err(ArithError::PrimeBoundExceeded { requested, ceiling }) => {
                log::warn!(
                    "Factoring {} needs primes up to {}, above the ceiling {}",
                    self.current,
                    requested,
                    ceiling
                );
                self.state = AliquotState::PrimeBoundExceeded { requested, ceiling };
                return Ok(self.state);
            }
            Err(e) => return Err(e),
        };

        if next == 0 {
            self.trajectory.push(0);
            self.current = 0;
            self.state = AliquotState::Terminated;
        } else if let Some(&index) = self.seen.get(&next) {
            let period = self.trajectory.len() - index;
            let representative = self.trajectory[index..]
                .iter()
                .copied()
                .min()
                .unwrap_or(next);
            self.state = AliquotState::Cycle {
                period,
                representative,
            };
        } else {
            self.seen.insert(next, self.trajectory.len());
            self.trajectory.push(next);
            self.current = next;
            if self.trajectory.len() > self.bounds.max_length {
                log::warn!("Maximum length {} exceeded.", self.bounds.max_length);
                self.state = AliquotState::LengthExceeded;
            } else if next > self.bounds.max_value {
                log::warn!("Largest value {} > {}", next, self.bounds.max_value);
                self.state = AliquotState::ValueExceeded;
            }
        }
        Ok(self.state)
    }

    fn collect_growth(&mut self) {
        for event in self.registry.drain_growth_events() {
            log::warn!(
                "sieved up to {} from {}",
                event.new_frontier,
                event.old_frontier
            );
            self.growth.push(event);
        }
    }

    /// Consume the sequence into a report, whatever its state.
    pub fn finish(mut self) -> AliquotReport {
        log::debug!(
            "aliquot({}): {} after {} terms",
            self.trajectory[0],
            self.state,
            self.trajectory.len()
        );
        let trajectory = std::mem::take(&mut self.trajectory);
        AliquotReport {
            start: trajectory[0],
            trajectory,
            state: self.state,
            growth: std::mem::take(&mut self.growth),
        }
    }
}

impl Drop for AliquotSequence<'_> {
    fn drop(&mut self) {
        self.registry.replace_ceiling(self.saved_ceiling);
    }
}
