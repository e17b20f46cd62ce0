use std::collections::HashSet;

use aliquot::{survey, AliquotBounds, AliquotEngine, AliquotReport, AliquotState, CycleKind};
use arith_core::{ArithError, PrimeRegistry, RegistryConfig};
use multiplicative::{aliquot_sum, sum_of_divisors};

fn run(start: u64, bounds: AliquotBounds) -> AliquotReport {
    let mut registry = PrimeRegistry::new();
    AliquotEngine::new(&mut registry).run(start, &bounds).unwrap()
}

/// Every consecutive pair in a trajectory must satisfy a(i+1) = s(a(i)).
fn assert_successors(report: &AliquotReport) {
    let mut registry = PrimeRegistry::new();
    let sigma = sum_of_divisors();
    for pair in report.trajectory.windows(2) {
        assert_eq!(
            aliquot_sum(&sigma, &mut registry, pair[0]).unwrap(),
            pair[1],
            "s({}) in trajectory of {}",
            pair[0],
            report.start
        );
    }
}

#[test]
fn test_perfect_numbers() {
    for n in [6u64, 28, 496, 8128] {
        let report = run(n, AliquotBounds::default());
        assert_eq!(report.trajectory, vec![n]);
        assert_eq!(
            report.state,
            AliquotState::Cycle {
                period: 1,
                representative: n
            }
        );
        assert_eq!(report.state.cycle_kind(), Some(CycleKind::Perfect));
    }
}

#[test]
fn test_amicable_pair_from_both_ends() {
    let report = run(220, AliquotBounds::default());
    assert_eq!(report.trajectory, vec![220, 284]);
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 2,
            representative: 220
        }
    );

    let report = run(284, AliquotBounds::default());
    assert_eq!(report.trajectory, vec![284, 220]);
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 2,
            representative: 220
        }
    );
}

#[test]
fn test_sociable_chain_of_four() {
    let bounds = AliquotBounds::default().with_max_value(2_000_000);
    let report = run(1_264_460, bounds);
    assert_eq!(
        report.trajectory,
        vec![1_264_460, 1_547_860, 1_727_636, 1_305_184]
    );
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 4,
            representative: 1_264_460
        }
    );
    assert_eq!(report.state.cycle_kind(), Some(CycleKind::Sociable(4)));
    assert_successors(&report);
}

#[test]
fn test_sociable_chain_of_five() {
    let report = run(12_496, AliquotBounds::default());
    assert_eq!(report.trajectory, vec![12_496, 14_288, 15_472, 14_536, 14_264]);
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 5,
            representative: 12_496
        }
    );
}

#[test]
fn test_sociable_chain_of_twenty_eight() {
    let report = run(14_316, AliquotBounds::new(50, 1_000_000, 100_000));
    assert_eq!(report.len(), 28);
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 28,
            representative: 14_316
        }
    );
    assert_eq!(report.peak().map(|(_, v)| v), Some(629_072));
    assert_successors(&report);
}

#[test]
fn test_360_terminates() {
    let report = run(360, AliquotBounds::default());
    assert_eq!(report.state, AliquotState::Terminated);
    assert_eq!(report.len(), 31);
    assert_eq!(&report.trajectory[..4], &[360, 810, 1_368, 2_532]);
    assert_eq!(report.trajectory[13], 6_490);
    assert_eq!(report.peak(), Some((13, 6_490)));
    assert_eq!(report.trajectory.last(), Some(&0));
    assert_eq!(&report.trajectory[report.len() - 2..], &[1, 0]);
    assert_successors(&report);
}

#[test]
fn test_276_hits_length_bound() {
    let report = run(276, AliquotBounds::new(25, 1_000_000, 100_000));
    assert_eq!(report.state, AliquotState::LengthExceeded);
    assert_eq!(report.len(), 26);
    assert!(report.trajectory.iter().all(|&v| v < 1_000_000));

    let distinct: HashSet<u64> = report.trajectory.iter().copied().collect();
    assert_eq!(distinct.len(), report.len());
    assert_eq!(&report.trajectory[..4], &[276, 396, 696, 1_104]);
    assert_eq!(report.peak().map(|(_, v)| v), Some(465_780));
    assert_successors(&report);
}

#[test]
fn test_276_hits_value_bound_by_default() {
    let report = run(276, AliquotBounds::default());
    assert_eq!(report.state, AliquotState::ValueExceeded);
    let last = *report.trajectory.last().unwrap();
    assert!(last > 100_000);
    assert!(report.trajectory[..report.len() - 1]
        .iter()
        .all(|&v| v <= 100_000));
}

#[test]
fn test_entering_a_cycle_from_outside() {
    // 95 -> 25 -> 6 -> 6
    let report = run(95, AliquotBounds::default());
    assert_eq!(report.trajectory, vec![95, 25, 6]);
    assert_eq!(
        report.state,
        AliquotState::Cycle {
            period: 1,
            representative: 6
        }
    );
    assert_eq!(report.cycle(), Some(&[6u64][..]));

    // 562 -> 284 -> 220 -> 284
    let report = run(562, AliquotBounds::default());
    assert_eq!(report.trajectory, vec![562, 284, 220]);
    assert_eq!(report.cycle(), Some(&[284u64, 220][..]));
}

#[test]
fn test_value_bound_leaves_registry_untouched() {
    let mut registry = PrimeRegistry::new();
    let report = AliquotEngine::new(&mut registry)
        .run(128, &AliquotBounds::new(50, 100, 10))
        .unwrap();
    assert_eq!(report.trajectory, vec![128, 127]);
    assert_eq!(report.state, AliquotState::ValueExceeded);
    assert!(report.growth.is_empty());
    assert_eq!(registry.frontier(), 10);
    assert_eq!(registry.extensions(), 0);
}

#[test]
fn test_prime_bound_reported_as_state() {
    let mut registry = PrimeRegistry::new();
    let report = AliquotEngine::new(&mut registry)
        .run(128, &AliquotBounds::new(50, 1_000, 10))
        .unwrap();
    assert_eq!(
        report.state,
        AliquotState::PrimeBoundExceeded {
            requested: 11,
            ceiling: 10
        }
    );
    assert!(report.state.is_bound_exceeded());
    assert!(report.padded(10).is_none());
}

#[test]
fn test_prime_bound_above_default_ceiling() {
    // sqrt of this prime is 141421, past the default ceiling of 100000
    let p = 20_000_000_089u64;
    let bounds = AliquotBounds::new(50, 100_000_000_000, 1_000_000);

    let mut registry = PrimeRegistry::from_config(&bounds.registry_config()).unwrap();
    let report = AliquotEngine::new(&mut registry).run(p, &bounds).unwrap();
    assert_eq!(report.trajectory, vec![p, 1, 0]);
    assert_eq!(report.state, AliquotState::Terminated);
    assert!(registry.frontier() >= 141_421);
    assert!(registry.frontier() <= 1_000_000);

    let summary = survey(p..=p, &bounds, &bounds.registry_config()).unwrap();
    assert_eq!(summary.terminated, 1);
    assert_eq!(summary.prime_bound_exceeded, 0);

    // A default registry still caps the run at its own ceiling
    let mut capped = PrimeRegistry::new();
    let report = AliquotEngine::new(&mut capped).run(p, &bounds).unwrap();
    assert_eq!(
        report.state,
        AliquotState::PrimeBoundExceeded {
            requested: 141_421,
            ceiling: 100_000
        }
    );
}

#[test]
fn test_registry_shared_across_runs() {
    let mut registry = PrimeRegistry::new();
    let bounds = AliquotBounds::default().with_max_value(2_000_000);

    let first = AliquotEngine::new(&mut registry).run(1_264_460, &bounds).unwrap();
    assert!(!first.growth.is_empty());
    let frontier = registry.frontier();
    assert_eq!(
        first.growth.last().map(|e| e.new_frontier),
        Some(frontier)
    );

    let second = AliquotEngine::new(&mut registry).run(1_264_460, &bounds).unwrap();
    assert_eq!(second.trajectory, first.trajectory);
    assert!(second.growth.is_empty());
    assert_eq!(registry.frontier(), frontier);

    // A smaller start reuses the same primes as well
    let third = AliquotEngine::new(&mut registry).run(220, &bounds).unwrap();
    assert!(third.growth.is_empty());
}

#[test]
fn test_growth_events_chain() {
    let mut registry = PrimeRegistry::new();
    let report = AliquotEngine::new(&mut registry)
        .run(360, &AliquotBounds::default())
        .unwrap();
    for event in &report.growth {
        assert!(event.new_frontier > event.old_frontier);
    }
    for pair in report.growth.windows(2) {
        assert_eq!(pair[0].new_frontier, pair[1].old_frontier);
    }
    assert_eq!(registry.extensions(), report.growth.len());
}

#[test]
fn test_padding() {
    let report = run(12, AliquotBounds::default());
    assert_eq!(
        report.padded(10),
        Some(vec![12, 16, 15, 9, 4, 3, 1, 0, 0, 0])
    );
    // never truncates
    assert_eq!(report.padded(3).map(|t| t.len()), Some(8));

    let report = run(562, AliquotBounds::default());
    assert_eq!(
        report.padded(7),
        Some(vec![562, 284, 220, 284, 220, 284, 220])
    );
}

#[test]
fn test_invalid_inputs() {
    let mut registry = PrimeRegistry::new();
    let mut engine = AliquotEngine::new(&mut registry);
    assert!(matches!(
        engine.run(0, &AliquotBounds::default()),
        Err(ArithError::Domain { value: 0, .. })
    ));
    for bounds in [
        AliquotBounds::default().with_max_length(0),
        AliquotBounds::default().with_max_value(0),
        AliquotBounds::default().with_max_prime(0),
    ] {
        assert!(engine.run(12, &bounds).is_err());
    }
}

#[test]
fn test_report_serializes() {
    let report = run(220, AliquotBounds::default());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["start"], 220);
    assert_eq!(json["trajectory"], serde_json::json!([220, 284]));
    assert_eq!(json["state"]["Cycle"]["period"], 2);
    let back: AliquotReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_survey_first_thousand() {
    let summary = survey(
        1..=1_000,
        &AliquotBounds::default(),
        &RegistryConfig::default(),
    )
    .unwrap();
    assert_eq!(summary.total(), 1_000);
    assert_eq!(summary.terminated, 932);
    assert_eq!(summary.cyclic, 22);
    assert_eq!(summary.value_exceeded, 42);
    assert_eq!(summary.length_exceeded, 4);
    assert_eq!(summary.prime_bound_exceeded, 0);
    assert_eq!(summary.unresolved.len(), 46);
    assert!(summary.unresolved.contains(&276));

    let reached: Vec<(u64, usize)> = summary
        .cycles
        .iter()
        .map(|(&min, c)| (min, c.reached_from))
        .collect();
    assert_eq!(reached, vec![(6, 13), (28, 1), (220, 3), (496, 5)]);
    assert_eq!(summary.cycles[&220].members, vec![220, 284]);
    assert_eq!(summary.cycles[&220].kind, CycleKind::Amicable);
}

#[test]
fn test_survey_matches_sequential_runs() {
    let bounds = AliquotBounds::default();
    let summary = survey(200..=260, &bounds, &RegistryConfig::default()).unwrap();

    let mut registry = PrimeRegistry::new();
    let mut terminated = 0;
    for n in 200..=260u64 {
        let report = AliquotEngine::new(&mut registry).run(n, &bounds).unwrap();
        if report.state == AliquotState::Terminated {
            terminated += 1;
        }
    }
    assert_eq!(summary.terminated, terminated);
}
