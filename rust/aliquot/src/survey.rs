//! Classify every start in a range and collect the cycles reached.
//!
//! Sequences are independent, so starts are spread across rayon workers.
//! Each worker owns a clone of a template registry; no registry is shared
//! between threads.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use arith_core::{ArithError, PrimeRegistry, RegistryConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bounds::AliquotBounds;
use crate::engine::AliquotEngine;
use crate::outcome::{AliquotState, CycleKind};

/// A distinct cycle, rotated to begin at its smallest member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub kind: CycleKind,
    pub members: Vec<u64>,
    /// Number of surveyed starts whose sequence fell into this cycle.
    pub reached_from: usize,
}

/// Per-state counts and distinct cycles over a surveyed range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub first: u64,
    pub last: u64,
    pub terminated: usize,
    pub cyclic: usize,
    pub length_exceeded: usize,
    pub value_exceeded: usize,
    pub prime_bound_exceeded: usize,
    /// Distinct cycles keyed by their smallest member.
    pub cycles: BTreeMap<u64, CycleRecord>,
    /// Starts whose sequence stopped on a bound, ascending.
    pub unresolved: Vec<u64>,
}

impl SurveySummary {
    pub fn total(&self) -> usize {
        self.terminated
            + self.cyclic
            + self.length_exceeded
            + self.value_exceeded
            + self.prime_bound_exceeded
    }

    pub fn cycles_of_kind(&self, kind: CycleKind) -> impl Iterator<Item = &CycleRecord> {
        self.cycles.values().filter(move |c| c.kind == kind)
    }
}

struct Classified {
    start: u64,
    state: AliquotState,
    cycle: Option<Vec<u64>>,
}

/// Rotate a cycle so its smallest member comes first.
fn canonical_cycle(members: &[u64]) -> Vec<u64> {
    let pivot = members
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut rotated = members[pivot..].to_vec();
    rotated.extend_from_slice(&members[..pivot]);
    rotated
}

/// Run every start in `starts` under `bounds` and summarise the outcomes.
pub fn survey(
    starts: RangeInclusive<u64>,
    bounds: &AliquotBounds,
    config: &RegistryConfig,
) -> Result<SurveySummary, ArithError> {
    let template = PrimeRegistry::from_config(config)?;
    let (first, last) = (*starts.start(), *starts.end());
    log::info!("Surveying aliquot sequences for {}..={}", first, last);

    let classified: Vec<Classified> = starts
        .into_par_iter()
        .map_init(
            || template.clone(),
            |registry, start| -> Result<Classified, ArithError> {
                let report = AliquotEngine::new(registry).run(start, bounds)?;
                Ok(Classified {
                    start,
                    state: report.state,
                    cycle: report.cycle().map(canonical_cycle),
                })
            },
        )
        .collect::<Result<Vec<_>, ArithError>>()?;

    let mut summary = SurveySummary {
        first,
        last,
        ..SurveySummary::default()
    };
    for entry in classified {
        match entry.state {
            AliquotState::Terminated => summary.terminated += 1,
            AliquotState::Cycle { .. } => summary.cyclic += 1,
            AliquotState::LengthExceeded => summary.length_exceeded += 1,
            AliquotState::ValueExceeded => summary.value_exceeded += 1,
            AliquotState::PrimeBoundExceeded { .. } => summary.prime_bound_exceeded += 1,
            AliquotState::Running => {}
        }
        if entry.state.is_bound_exceeded() {
            summary.unresolved.push(entry.start);
        }
        if let (Some(members), Some(kind)) = (entry.cycle, entry.state.cycle_kind()) {
            summary
                .cycles
                .entry(members[0])
                .or_insert_with(|| CycleRecord {
                    kind,
                    members,
                    reached_from: 0,
                })
                .reached_from += 1;
        }
    }
    summary.unresolved.sort_unstable();

    log::info!(
        "Survey {}..={}: {} terminating, {} periodic ({} distinct cycles), {} unresolved",
        first,
        last,
        summary.terminated,
        summary.cyclic,
        summary.cycles.len(),
        summary.unresolved.len()
    );
    Ok(summary)
}
