use arith_core::{is_prime_trial_division, Primality, PrimeRegistry, RegistryConfig};

fn main() {
    env_logger::init();

    println!("=== Prime Registry: Incremental Sieving ===\n");

    section_1_small_primes();
    section_2_growth_events();
    section_3_factorizations();
    section_4_probe_without_sieving();
}

// -------------------------------------------------------------------------
// Section 1: Small primes
// -------------------------------------------------------------------------

fn section_1_small_primes() {
    println!("--- Section 1: Primes up to 100 ---\n");

    let mut registry = PrimeRegistry::new();
    match registry.primes_up_to(100) {
        Ok(primes) => {
            for row in primes.chunks(10) {
                let cells: Vec<String> = row.iter().map(|p| format!("{:>4}", p)).collect();
                println!("  {}", cells.join(""));
            }
        }
        Err(e) => println!("  error: {}", e),
    }

    let disagreements = (0..10_000u64)
        .filter(|&n| registry.is_prime(n).ok() != Some(is_prime_trial_division(n)))
        .count();
    println!(
        "\n  Cross-check against trial division on [0, 10000): {} disagreements\n",
        disagreements
    );
}

// -------------------------------------------------------------------------
// Section 2: Growth events
// -------------------------------------------------------------------------

fn section_2_growth_events() {
    println!("--- Section 2: Growth Events for Increasing Queries ---\n");

    let mut registry = PrimeRegistry::new();
    println!("  {:>10} | {:>8} | {:>10} | {}", "query", "prime?", "frontier", "events");
    println!("  {}", "-".repeat(56));

    for n in [11u64, 97, 1_009, 7_919, 65_537, 99_991, 100_003] {
        let answer = match registry.is_prime(n) {
            Ok(true) => "yes".to_string(),
            Ok(false) => "no".to_string(),
            Err(e) => format!("{}", e),
        };
        let events: Vec<String> = registry
            .drain_growth_events()
            .iter()
            .map(|e| format!("{}->{}", e.old_frontier, e.new_frontier))
            .collect();
        println!(
            "  {:>10} | {:>8} | {:>10} | {}",
            n,
            answer,
            registry.frontier(),
            events.join(", ")
        );
    }
    println!(
        "\n  {} extensions, {} primes known\n",
        registry.extensions(),
        registry.len()
    );
}

// -------------------------------------------------------------------------
// Section 3: Factorizations
// -------------------------------------------------------------------------

fn section_3_factorizations() {
    println!("--- Section 3: Factorizations (sieving only to sqrt) ---\n");

    let config = RegistryConfig {
        seed_frontier: 10,
        ceiling: 10_000,
    };
    let mut registry = match PrimeRegistry::from_config(&config) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    for n in [360u64, 1_264_460, 1_727_636, 999_983, 2 * 999_983, 1_000_001] {
        match registry.factorize(n) {
            Ok(f) => println!(
                "  {:>10} = {:<24} frontier {}",
                n,
                f.to_string(),
                registry.frontier()
            ),
            Err(e) => println!("  {:>10}: {}", n, e),
        }
    }

    if let Ok(f) = registry.factorize(1_264_460) {
        if let Ok(json) = serde_json::to_string(&f) {
            println!("\n  JSON: {}", json);
        }
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 4: Probing
// -------------------------------------------------------------------------

fn section_4_probe_without_sieving() {
    println!("--- Section 4: Probing Without Sieving ---\n");

    let registry = PrimeRegistry::new();
    for n in [7u64, 49, 97, 119, 121, 127, 143] {
        let label = match registry.probe(n) {
            Primality::Prime => "prime",
            Primality::Composite => "composite",
            Primality::Unknown => "unknown",
        };
        println!("  {:>5}: {}", n, label);
    }
    println!("\n  frontier still {}", registry.frontier());
}
