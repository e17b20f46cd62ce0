//! Prime factorizations as ascending (prime, exponent) pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique factorization of a positive integer.
///
/// Only built by [`crate::PrimeRegistry::factorize`], so every prime is a
/// sieved prime, primes are distinct and ascending, exponents are at least 1,
/// and the product fits in `u64`. The empty factorization stands for 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Factorization {
    factors: Vec<(u64, u32)>,
}

impl Factorization {
    pub(crate) fn from_ascending(factors: Vec<(u64, u32)>) -> Self {
        debug_assert!(factors.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(factors.iter().all(|&(_, e)| e >= 1));
        Self { factors }
    }

    /// The (prime, exponent) pairs in ascending prime order.
    pub fn pairs(&self) -> &[(u64, u32)] {
        &self.factors
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.factors.iter().copied()
    }

    /// Whether this is the factorization of 1.
    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }

    /// The integer this factorization multiplies out to.
    pub fn value(&self) -> u64 {
        self.factors.iter().map(|&(p, e)| p.pow(e)).product()
    }

    /// Number of distinct prime factors, omega(n).
    pub fn omega(&self) -> usize {
        self.factors.len()
    }

    /// Number of prime factors counted with multiplicity, Omega(n).
    pub fn big_omega(&self) -> u32 {
        self.factors.iter().map(|&(_, e)| e).sum()
    }

    pub fn is_square_free(&self) -> bool {
        self.factors.iter().all(|&(_, e)| e == 1)
    }

    /// True when no prime appears in both factorizations.
    pub fn is_coprime_to(&self, other: &Factorization) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.factors.len() && j < other.factors.len() {
            let (p, q) = (self.factors[i].0, other.factors[j].0);
            if p == q {
                return false;
            }
            if p < q {
                i += 1;
            } else {
                j += 1;
            }
        }
        true
    }

    /// Every positive divisor, ascending.
    pub fn divisors(&self) -> Vec<u64> {
        let mut divisors = vec![1u64];
        for &(p, e) in &self.factors {
            let current = divisors.len();
            let mut power = 1u64;
            for _ in 0..e {
                power *= p;
                for i in 0..current {
                    divisors.push(divisors[i] * power);
                }
            }
        }
        divisors.sort_unstable();
        divisors
    }
}

impl<'a> IntoIterator for &'a Factorization {
    type Item = (u64, u32);
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, (u64, u32)>>;

    fn into_iter(self) -> Self::IntoIter {
        self.factors.iter().copied()
    }
}

impl fmt::Display for Factorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        for (i, &(p, e)) in self.factors.iter().enumerate() {
            if i > 0 {
                write!(f, " * ")?;
            }
            if e == 1 {
                write!(f, "{}", p)?;
            } else {
                write!(f, "{}^{}", p, e)?;
            }
        }
        Ok(())
    }
}
