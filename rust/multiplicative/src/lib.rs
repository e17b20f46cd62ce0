//! Multiplicative arithmetic functions built from prime-power rules.
//!
//! A function f is multiplicative when f(1) = 1 and f(ab) = f(a) f(b) for
//! coprime a and b, so it is fixed by its values f(p^e) on prime powers.
//! [`lift`] takes such a rule and returns the function on all positive
//! integers: factor n with a [`PrimeRegistry`], evaluate the rule on each
//! (p, e) pair, and multiply. Multiplicativity then holds by construction.
//!
//! The standard instances (sigma, totient, divisor count, ...) live in
//! [`functions`].

pub mod functions;

pub use functions::{
    abundancy, aliquot_sum, classify, divisor_count, mobius, sigma_k, square_free,
    sum_of_divisors, totient, DivisorClass,
};

use std::fmt;
use std::sync::Arc;

use arith_core::{ArithError, Factorization, PrimeRegistry};
use num_traits::{CheckedMul, One};

/// Value of a function at a prime power, or `None` if it does not fit in `V`.
pub type PrimePowerRule<V> = dyn Fn(u64, u32) -> Option<V> + Send + Sync;

/// A multiplicative function, stored as its prime-power rule.
pub struct Multiplicative<V> {
    name: &'static str,
    rule: Arc<PrimePowerRule<V>>,
}

impl<V> Clone for Multiplicative<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            rule: Arc::clone(&self.rule),
        }
    }
}

impl<V> fmt::Debug for Multiplicative<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multiplicative")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Lift an infallible prime-power rule `f(p, e)` to a multiplicative function.
pub fn lift<V, F>(name: &'static str, rule: F) -> Multiplicative<V>
where
    V: One + CheckedMul,
    F: Fn(u64, u32) -> V + Send + Sync + 'static,
{
    Multiplicative::checked(name, move |p, e| Some(rule(p, e)))
}

impl<V: One + CheckedMul> Multiplicative<V> {
    /// Lift a rule that reports overflow by returning `None`.
    pub fn checked<F>(name: &'static str, rule: F) -> Self
    where
        F: Fn(u64, u32) -> Option<V> + Send + Sync + 'static,
    {
        Self {
            name,
            rule: Arc::new(rule),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The rule itself, f(p^e) for prime `p` and `e >= 1`.
    pub fn at_prime_power(&self, p: u64, e: u32) -> Option<V> {
        (self.rule)(p, e)
    }

    /// Evaluate at `n >= 1`, factoring through `registry`.
    ///
    /// Propagates `PrimeBoundExceeded` from the registry untouched.
    pub fn eval(&self, registry: &mut PrimeRegistry, n: u64) -> Result<V, ArithError> {
        if n == 0 {
            return Err(ArithError::Domain {
                function: self.name,
                value: 0,
            });
        }
        let factorization = registry.factorize(n)?;
        log::trace!("{}({}) over {}", self.name, n, factorization);
        self.eval_factorization(&factorization)
    }

    /// Evaluate on an existing factorization, skipping the registry.
    pub fn eval_factorization(&self, factorization: &Factorization) -> Result<V, ArithError> {
        factorization
            .iter()
            .try_fold(V::one(), |acc, (p, e)| acc.checked_mul(&(self.rule)(p, e)?))
            .ok_or(ArithError::Overflow {
                function: self.name,
                value: factorization.value(),
            })
    }
}
