//! Scaling runs for the prime registry and aliquot engine.
//!
//! Measures how sieve cost, sigma evaluation and aliquot runs grow with the
//! size of their inputs, and how much a shared registry saves over fresh ones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

use aliquot::{survey, AliquotBounds, AliquotEngine};
use arith_core::{PrimeRegistry, RegistryConfig};
use multiplicative::sum_of_divisors;

fn main() {
    env_logger::init();

    println!("================================================================");
    println!("  SCALING: Prime Registry and Aliquot Sequences");
    println!("================================================================\n");

    bench_sieve_scaling();
    bench_sigma_scaling();
    bench_registry_reuse();
    bench_survey_scaling();
}

// ============================================================================
// Sieve growth
// ============================================================================

fn bench_sieve_scaling() {
    println!("  Sieve growth from a fresh registry to each frontier:\n");
    println!(
        "  {:>10} {:>10} {:>12} {:>12}",
        "limit", "#primes", "extensions", "time_us"
    );
    println!("  {}", "-".repeat(48));

    for limit in [1_000u64, 3_000, 10_000, 30_000, 100_000] {
        let mut registry = PrimeRegistry::new();
        let start = Instant::now();
        let count = match registry.primes_up_to(limit) {
            Ok(primes) => primes.len(),
            Err(e) => {
                println!("  {:>10} error: {}", limit, e);
                continue;
            }
        };
        let elapsed = start.elapsed();
        println!(
            "  {:>10} {:>10} {:>12} {:>12}",
            limit,
            count,
            registry.extensions(),
            elapsed.as_micros()
        );
    }
    println!();
}

// ============================================================================
// Sigma evaluation
// ============================================================================

fn bench_sigma_scaling() {
    println!("  sigma(n) over 1000 random n of each size (shared registry):\n");
    println!(
        "  {:>5} {:>10} {:>12} {:>10}",
        "bits", "ok", "time_us", "frontier"
    );
    println!("  {}", "-".repeat(42));

    let mut rng = StdRng::seed_from_u64(12345);
    let mut registry = PrimeRegistry::new();
    let sigma = sum_of_divisors();

    for bits in [12u32, 16, 20, 24, 28, 32] {
        let inputs: Vec<u64> = (0..1_000)
            .map(|_| rng.gen_range(1u64 << (bits - 1)..1u64 << bits))
            .collect();
        let start = Instant::now();
        let ok = inputs
            .iter()
            .filter(|&&n| sigma.eval(&mut registry, n).is_ok())
            .count();
        let elapsed = start.elapsed();
        println!(
            "  {:>5} {:>10} {:>12} {:>10}",
            bits,
            ok,
            elapsed.as_micros(),
            registry.frontier()
        );
    }
    println!();
}

// ============================================================================
// Registry reuse
// ============================================================================

fn bench_registry_reuse() {
    println!("  Aliquot runs with a fresh registry per run vs one shared registry:\n");
    println!(
        "  {:>10} {:>8} {:>12} {:>12} {:>8}",
        "start", "terms", "fresh_us", "shared_us", "growth"
    );
    println!("  {}", "-".repeat(56));

    let bounds = AliquotBounds::new(50, 2_000_000, 100_000);
    let mut shared = PrimeRegistry::new();

    for n in [220u64, 276, 360, 12_496, 14_316, 1_264_460] {
        let start = Instant::now();
        let mut fresh = PrimeRegistry::new();
        let fresh_run = AliquotEngine::new(&mut fresh).run(n, &bounds);
        let fresh_us = start.elapsed().as_micros();

        let start = Instant::now();
        let shared_run = AliquotEngine::new(&mut shared).run(n, &bounds);
        let shared_us = start.elapsed().as_micros();

        match (fresh_run, shared_run) {
            (Ok(report), Ok(shared_report)) => println!(
                "  {:>10} {:>8} {:>12} {:>12} {:>8}",
                n,
                report.len(),
                fresh_us,
                shared_us,
                shared_report.growth.len()
            ),
            (Err(e), _) | (_, Err(e)) => println!("  {:>10} error: {}", n, e),
        }
    }
    println!();
}

// ============================================================================
// Parallel survey
// ============================================================================

fn bench_survey_scaling() {
    println!("  Survey of 1..=N with default bounds:\n");
    println!(
        "  {:>8} {:>10} {:>10} {:>10} {:>8} {:>12}",
        "N", "terminate", "periodic", "bounded", "cycles", "time_ms"
    );
    println!("  {}", "-".repeat(64));

    for high in [1_000u64, 5_000, 20_000] {
        let start = Instant::now();
        match survey(1..=high, &AliquotBounds::default(), &RegistryConfig::default()) {
            Ok(summary) => println!(
                "  {:>8} {:>10} {:>10} {:>10} {:>8} {:>12}",
                high,
                summary.terminated,
                summary.cyclic,
                summary.unresolved.len(),
                summary.cycles.len(),
                start.elapsed().as_millis()
            ),
            Err(e) => println!("  {:>8} error: {}", high, e),
        }
    }
    println!();
}
