//! Standard multiplicative functions and the divisor-sum helpers built on them.

use arith_core::{ArithError, PrimeRegistry};
use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use crate::{lift, Multiplicative};

/// 1 + m + m^2 + ... + m^e, or `None` on overflow.
fn geometric_sum(m: u64, e: u32) -> Option<u64> {
    (0..e).try_fold(1u64, |acc, _| acc.checked_mul(m)?.checked_add(1))
}

/// Sum of divisors, sigma(p^e) = (p^(e+1) - 1) / (p - 1).
pub fn sum_of_divisors() -> Multiplicative<u64> {
    Multiplicative::checked("sigma", geometric_sum)
}

/// Sum of the k-th powers of the divisors. sigma_0 counts divisors.
pub fn sigma_k(k: u32) -> Multiplicative<u64> {
    Multiplicative::checked("sigma_k", move |p, e| {
        let m = num_traits::checked_pow(p, k as usize)?;
        geometric_sum(m, e)
    })
}

/// Euler's totient, phi(p^e) = p^(e-1) (p - 1).
pub fn totient() -> Multiplicative<u64> {
    Multiplicative::checked("totient", |p, e| {
        num_traits::checked_pow(p, (e - 1) as usize)?.checked_mul(p - 1)
    })
}

/// Number of divisors, tau(p^e) = e + 1.
pub fn divisor_count() -> Multiplicative<u64> {
    lift("divisor_count", |_, e| e as u64 + 1)
}

/// 1 if no square of a prime divides n, otherwise 0.
pub fn square_free() -> Multiplicative<u64> {
    lift("square_free", |_, e| u64::from(e < 2))
}

/// The abundancy index sigma(n) / n as an exact fraction.
pub fn abundancy() -> Multiplicative<Ratio<u64>> {
    Multiplicative::checked("abundancy", |p, e| {
        let power = num_traits::checked_pow(p, e as usize)?;
        Some(Ratio::new(geometric_sum(p, e)?, power))
    })
}

/// Moebius function: 0 if n has a square factor, else (-1)^(number of primes).
pub fn mobius(registry: &mut PrimeRegistry, n: u64) -> Result<i8, ArithError> {
    if n == 0 {
        return Err(ArithError::Domain {
            function: "mobius",
            value: 0,
        });
    }
    let factorization = registry.factorize(n)?;
    if !factorization.is_square_free() {
        return Ok(0);
    }
    Ok(if factorization.omega() % 2 == 0 { 1 } else { -1 })
}

/// Sum of proper divisors, s(n) = sigma(n) - n. s(1) = 0.
///
/// `sigma` must be the divisor sum; a function smaller than n at n is
/// rejected as a `Domain` error.
pub fn aliquot_sum(
    sigma: &Multiplicative<u64>,
    registry: &mut PrimeRegistry,
    n: u64,
) -> Result<u64, ArithError> {
    sigma
        .eval(registry, n)?
        .checked_sub(n)
        .ok_or(ArithError::Domain {
            function: sigma.name(),
            value: n,
        })
}

/// Comparison of s(n) against n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivisorClass {
    Deficient,
    Perfect,
    Abundant,
}

pub fn classify(registry: &mut PrimeRegistry, n: u64) -> Result<DivisorClass, ArithError> {
    let s = aliquot_sum(&sum_of_divisors(), registry, n)?;
    Ok(match s.cmp(&n) {
        std::cmp::Ordering::Less => DivisorClass::Deficient,
        std::cmp::Ordering::Equal => DivisorClass::Perfect,
        std::cmp::Ordering::Greater => DivisorClass::Abundant,
    })
}
