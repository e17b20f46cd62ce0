use arith_core::{ArithError, PrimeRegistry};
use multiplicative::{
    abundancy, aliquot_sum, classify, divisor_count, lift, mobius, sum_of_divisors, totient,
    DivisorClass, Multiplicative,
};

fn main() {
    env_logger::init();

    println!("=== Multiplicative Functions from Prime-Power Rules ===\n");

    let mut registry = PrimeRegistry::new();

    section_1_standard_table(&mut registry);
    section_2_perfect_and_abundant(&mut registry);
    section_3_custom_rule(&mut registry);
}

// -------------------------------------------------------------------------
// Section 1: Standard functions
// -------------------------------------------------------------------------

fn section_1_standard_table(registry: &mut PrimeRegistry) {
    println!("--- Section 1: sigma, phi, tau, mu for n = 1..30 ---\n");

    let sigma = sum_of_divisors();
    let phi = totient();
    let tau = divisor_count();

    println!(
        "  {:>4} | {:<14} | {:>6} | {:>6} | {:>4} | {:>3} | {:>6}",
        "n", "factors", "sigma", "phi", "tau", "mu", "s(n)"
    );
    println!("  {}", "-".repeat(62));

    for n in 1..=30u64 {
        let row = table_row(registry, n, &sigma, &phi, &tau);
        match row {
            Ok(line) => println!("{}", line),
            Err(e) => println!("  {:>4} | error: {}", n, e),
        }
    }
    println!();
}

fn table_row(
    registry: &mut PrimeRegistry,
    n: u64,
    sigma: &Multiplicative<u64>,
    phi: &Multiplicative<u64>,
    tau: &Multiplicative<u64>,
) -> Result<String, ArithError> {
    let factors = registry.factorize(n)?;
    Ok(format!(
        "  {:>4} | {:<14} | {:>6} | {:>6} | {:>4} | {:>3} | {:>6}",
        n,
        factors.to_string(),
        sigma.eval(registry, n)?,
        phi.eval(registry, n)?,
        tau.eval(registry, n)?,
        mobius(registry, n)?,
        aliquot_sum(sigma, registry, n)?
    ))
}

// -------------------------------------------------------------------------
// Section 2: Perfect and abundant numbers
// -------------------------------------------------------------------------

fn section_2_perfect_and_abundant(registry: &mut PrimeRegistry) {
    println!("--- Section 2: Divisor classes below 10000 ---\n");

    let mut perfect = Vec::new();
    let mut abundant = 0usize;
    let mut deficient = 0usize;
    for n in 1..10_000u64 {
        match classify(registry, n) {
            Ok(DivisorClass::Perfect) => perfect.push(n),
            Ok(DivisorClass::Abundant) => abundant += 1,
            Ok(DivisorClass::Deficient) => deficient += 1,
            Err(e) => println!("  {}: {}", n, e),
        }
    }
    println!("  perfect:   {:?}", perfect);
    println!("  abundant:  {}", abundant);
    println!("  deficient: {}", deficient);

    let h = abundancy();
    for n in [6u64, 120, 672, 30_240] {
        match h.eval(registry, n) {
            Ok(ratio) => println!("  sigma({})/{} = {}", n, n, ratio),
            Err(e) => println!("  abundancy({}): {}", n, e),
        }
    }
    println!();
}

// -------------------------------------------------------------------------
// Section 3: A rule defined on the spot
// -------------------------------------------------------------------------

fn section_3_custom_rule(registry: &mut PrimeRegistry) {
    println!("--- Section 3: Custom rule (radical of n) ---\n");

    let radical = lift("radical", |p, _| p);
    for n in [1u64, 12, 360, 1_024, 1_264_460] {
        match radical.eval(registry, n) {
            Ok(r) => println!("  rad({}) = {}", n, r),
            Err(e) => println!("  rad({}): {}", n, e),
        }
    }
    println!("\n  registry frontier after all sections: {}", registry.frontier());
}
