//! Aliquot sequence driver
//!
//! Usage:
//!   aliquot N [--length=50] [--largest-value=100000] [--largest-prime=100000]
//!             [--bounds=FILE] [--pad[=LEN]] [--json]
//!   aliquot --survey=LOW-HIGH [--length=..] [--largest-value=..] [--largest-prime=..] [--json]
//!
//! Flags given on the command line override values loaded from `--bounds`.
//! Set RUST_LOG=warn to see sieve growth and bound warnings.

use std::collections::HashMap;

use aliquot::{survey, AliquotBounds, AliquotEngine, AliquotReport, CycleKind, SurveySummary};
use arith_core::PrimeRegistry;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args);

    let bounds = match bounds_from(&opts) {
        Ok(bounds) => bounds,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    };

    if let Some(range) = opts.get("survey") {
        run_survey(range, &bounds, opts.contains_key("json"));
        return;
    }

    let start = match args.iter().find(|a| !a.starts_with("--")) {
        Some(n) => match n.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Not a positive integer: {}", n);
                std::process::exit(1);
            }
        },
        None => {
            eprintln!("Usage: aliquot N [--length=..] [--largest-value=..] [--largest-prime=..] [--bounds=FILE] [--pad[=LEN]] [--json]");
            std::process::exit(1);
        }
    };

    let mut registry = match PrimeRegistry::from_config(&bounds.registry_config()) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let report = match AliquotEngine::new(&mut registry).run(start, &bounds) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if opts.contains_key("json") {
        print_json(&report);
    } else {
        print_report(&report, &registry);
    }

    if let Some(len) = opts.get("pad") {
        let len = len.parse::<usize>().unwrap_or(bounds.max_length);
        match report.padded(len) {
            Some(terms) => println!("\nPadded to {}: {:?}", terms.len(), terms),
            None => println!("\nCannot pad: the run stopped on a bound"),
        }
    }
}

fn print_report(report: &AliquotReport, registry: &PrimeRegistry) {
    println!("=== Aliquot sequence of {} ===\n", report.start);
    for (i, term) in report.trajectory.iter().enumerate() {
        println!("  a({:>2}) = {}", i, term);
    }
    println!();
    println!("  Status:      {}", report.state);
    if let Some(kind) = report.state.cycle_kind() {
        println!("  Cycle:       {} {:?}", kind, report.cycle().unwrap_or(&[]));
    }
    if let Some((index, value)) = report.peak() {
        println!("  Peak:        {} at a({})", value, index);
    }
    println!(
        "  Sieve:       {} primes up to {} ({} extensions this run)",
        registry.len(),
        registry.frontier(),
        report.growth.len()
    );
}

fn print_json(report: &AliquotReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize report: {}", e),
    }
}

fn run_survey(range: &str, bounds: &AliquotBounds, json: bool) {
    let Some((low, high)) = parse_range(range) else {
        eprintln!("Expected --survey=LOW-HIGH with 1 <= LOW <= HIGH, got {}", range);
        std::process::exit(1);
    };

    let summary = match survey(low..=high, bounds, &bounds.registry_config()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        }
    } else {
        print_summary(&summary);
    }
}

fn print_summary(summary: &SurveySummary) {
    println!(
        "=== Aliquot survey {}..={} ({} starts) ===\n",
        summary.first,
        summary.last,
        summary.total()
    );
    println!("  {:<22} {:>8}", "terminating", summary.terminated);
    println!("  {:<22} {:>8}", "periodic", summary.cyclic);
    println!("  {:<22} {:>8}", "length exceeded", summary.length_exceeded);
    println!("  {:<22} {:>8}", "value exceeded", summary.value_exceeded);
    println!("  {:<22} {:>8}", "prime bound exceeded", summary.prime_bound_exceeded);

    for (label, kind) in [("Perfect", CycleKind::Perfect), ("Amicable", CycleKind::Amicable)] {
        let found: Vec<String> = summary
            .cycles_of_kind(kind)
            .map(|c| format!("{:?} (x{})", c.members, c.reached_from))
            .collect();
        if !found.is_empty() {
            println!("\n  {}: {}", label, found.join(", "));
        }
    }
    for record in summary
        .cycles
        .values()
        .filter(|c| matches!(c.kind, CycleKind::Sociable(_)))
    {
        println!("\n  {}: {:?} (x{})", record.kind, record.members, record.reached_from);
    }
    if !summary.unresolved.is_empty() {
        let shown: Vec<String> = summary.unresolved.iter().take(20).map(|n| n.to_string()).collect();
        println!(
            "\n  Unresolved ({}): {}{}",
            summary.unresolved.len(),
            shown.join(", "),
            if summary.unresolved.len() > 20 { ", ..." } else { "" }
        );
    }
}

// ---------------------------------------------------------------------------
// Argument parsing helpers
// ---------------------------------------------------------------------------

fn parse_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for arg in args {
        if let Some(kv) = arg.strip_prefix("--") {
            if let Some((k, v)) = kv.split_once('=') {
                map.insert(k.to_string(), v.to_string());
            } else {
                map.insert(kv.to_string(), "true".to_string());
            }
        }
    }
    map
}

fn bounds_from(opts: &HashMap<String, String>) -> Result<AliquotBounds, String> {
    let mut bounds = match opts.get("bounds") {
        Some(path) => AliquotBounds::from_json_file(path).map_err(|e| format!("{}: {}", path, e))?,
        None => AliquotBounds::default(),
    };
    if let Some(v) = parse_flag(opts, "length")? {
        bounds.max_length = v as usize;
    }
    if let Some(v) = parse_flag(opts, "largest-value")? {
        bounds.max_value = v;
    }
    if let Some(v) = parse_flag(opts, "largest-prime")? {
        bounds.max_prime = v;
    }
    bounds.validate().map_err(|e| e.to_string())?;
    Ok(bounds)
}

fn parse_flag(opts: &HashMap<String, String>, key: &str) -> Result<Option<u64>, String> {
    opts.get(key)
        .map(|v| v.parse::<u64>().map_err(|_| format!("--{} expects an integer, got {}", key, v)))
        .transpose()
}

fn parse_range(range: &str) -> Option<(u64, u64)> {
    let (low, high) = range.split_once('-')?;
    let (low, high) = (low.trim().parse::<u64>().ok()?, high.trim().parse::<u64>().ok()?);
    (low >= 1 && low <= high).then_some((low, high))
}
