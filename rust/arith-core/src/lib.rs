//! Shared primes, factorizations, and error types for the arithmetic workspace.
//!
//! The centre of this crate is [`PrimeRegistry`], an explicit, caller-owned
//! list of every prime up to a sieve frontier. The registry grows on demand by
//! segmented sieving and never shrinks; a configurable ceiling bounds how far
//! it may grow. Factorizations are produced by repeated smallest-prime-factor
//! extraction and only ever require the frontier to reach the square root of
//! the remaining cofactor.

pub mod factor;
pub mod registry;

pub use factor::Factorization;
pub use registry::{
    GrowthEvent, Primality, PrimeRegistry, RegistryConfig, DEFAULT_PRIME_CEILING,
    DEFAULT_SEED_FRONTIER,
};

/// Errors raised by prime queries and arithmetic functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    #[error("{function} is undefined for {value}")]
    Domain { function: &'static str, value: u64 },

    #[error("sieving to {requested} would exceed the prime ceiling {ceiling}")]
    PrimeBoundExceeded { requested: u64, ceiling: u64 },

    #[error("{function}({value}) does not fit in u64")]
    Overflow { function: &'static str, value: u64 },
}

/// Reference primality test by trial division over all candidates up to sqrt(n).
///
/// Independent of any registry; used to cross-check sieve output.
pub fn is_prime_trial_division(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Sum of all positive divisors of `n` by brute-force enumeration.
///
/// Quadratic-ish in `sqrt(n)`; only meant for verifying the lifted sigma.
pub fn divisor_sum_brute_force(n: u64) -> u64 {
    let mut total = 0u64;
    let mut d = 1u64;
    while d <= n / d {
        if n % d == 0 {
            total += d;
            let pair = n / d;
            if pair != d {
                total += pair;
            }
        }
        d += 1;
    }
    total
}
