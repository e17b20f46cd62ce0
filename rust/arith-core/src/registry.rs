//! Incrementally sieved registry of small primes.
//!
//! The registry holds every prime up to its frontier, in ascending order, and
//! extends itself with a segmented sieve of Eratosthenes whenever a query
//! reaches past the frontier. Each extension at least doubles the frontier so
//! that a run of increasing queries costs O(log frontier) extensions.
//!
//! Extensions are refused, with the registry left untouched, when they would
//! pass the configured ceiling.

use num_integer::Roots;
use serde::{Deserialize, Serialize};

use crate::factor::Factorization;
use crate::ArithError;

/// Frontier sieved at construction: the single-digit primes.
pub const DEFAULT_SEED_FRONTIER: u64 = 10;

/// Default ceiling on the sieve frontier.
pub const DEFAULT_PRIME_CEILING: u64 = 100_000;

/// A single sieve extension, from `old_frontier` to `new_frontier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrowthEvent {
    pub old_frontier: u64,
    pub new_frontier: u64,
}

/// Construction parameters for a [`PrimeRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Frontier sieved up front (no growth events are recorded for it).
    pub seed_frontier: u64,
    /// Largest frontier the registry may ever reach.
    pub ceiling: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed_frontier: DEFAULT_SEED_FRONTIER,
            ceiling: DEFAULT_PRIME_CEILING,
        }
    }
}

/// Answer to a primality question that is not allowed to sieve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primality {
    Prime,
    Composite,
    /// The known primes are too few to decide.
    Unknown,
}

/// Ordered, gap-free list of the primes up to a frontier.
#[derive(Debug, Clone)]
pub struct PrimeRegistry {
    primes: Vec<u64>,
    frontier: u64,
    ceiling: u64,
    pending: Vec<GrowthEvent>,
    extensions: usize,
}

impl Default for PrimeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimeRegistry {
    /// Registry seeded with the single-digit primes and the default ceiling.
    pub fn new() -> Self {
        Self::seeded(DEFAULT_SEED_FRONTIER, DEFAULT_PRIME_CEILING)
    }

    /// Empty registry (frontier 1) with the given ceiling.
    pub fn with_ceiling(ceiling: u64) -> Self {
        Self::seeded(1, ceiling)
    }

    /// Build a registry from a config, sieving the seed range immediately.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ArithError> {
        if config.seed_frontier > config.ceiling {
            return Err(ArithError::PrimeBoundExceeded {
                requested: config.seed_frontier,
                ceiling: config.ceiling,
            });
        }
        Ok(Self::seeded(config.seed_frontier, config.ceiling))
    }

    fn seeded(seed_frontier: u64, ceiling: u64) -> Self {
        let mut registry = PrimeRegistry {
            primes: Vec::new(),
            frontier: 1,
            ceiling,
            pending: Vec::new(),
            extensions: 0,
        };
        if seed_frontier > 1 {
            registry.extend_to(seed_frontier);
            registry.pending.clear();
            registry.extensions = 0;
        }
        registry
    }

    /// Largest integer whose primality has been fully decided.
    pub fn frontier(&self) -> u64 {
        self.frontier
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Replace the ceiling, returning the previous one.
    ///
    /// Lowering the ceiling below the frontier forgets nothing; it only
    /// refuses further growth.
    pub fn replace_ceiling(&mut self, ceiling: u64) -> u64 {
        std::mem::replace(&mut self.ceiling, ceiling)
    }

    /// Every prime up to the frontier, ascending.
    pub fn known_primes(&self) -> &[u64] {
        &self.primes
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Number of sieve extensions performed since construction.
    pub fn extensions(&self) -> usize {
        self.extensions
    }

    /// Take the growth events recorded since the last drain.
    pub fn drain_growth_events(&mut self) -> Vec<GrowthEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Make sure every integer up to `needed` has been sieved.
    ///
    /// Grows to `max(needed, 2 * frontier)`, clamped to the ceiling. Fails
    /// without touching the registry when `needed` itself is above the
    /// ceiling. Re-requesting a frontier already reached is a no-op.
    pub fn ensure_frontier(&mut self, needed: u64) -> Result<(), ArithError> {
        if needed <= self.frontier {
            return Ok(());
        }
        if needed > self.ceiling {
            return Err(ArithError::PrimeBoundExceeded {
                requested: needed,
                ceiling: self.ceiling,
            });
        }
        let target = needed
            .max(self.frontier.saturating_mul(2))
            .min(self.ceiling);
        self.extend_to(target);
        Ok(())
    }

    /// Sieve the segment (frontier, target] and append its primes.
    ///
    /// Base primes up to sqrt(target) are sieved first, recursively, so the
    /// marking below only ever uses primes already in the list.
    fn extend_to(&mut self, target: u64) {
        if target <= self.frontier {
            return;
        }
        let root = target.sqrt();
        if root > self.frontier {
            self.extend_to(root);
        }

        let low = self.frontier + 1;
        let mut composite = vec![false; (target - self.frontier) as usize];
        for &p in &self.primes {
            if p > root {
                break;
            }
            let first = (p * p).max(low.div_ceil(p) * p);
            for multiple in (first..=target).step_by(p as usize) {
                composite[(multiple - low) as usize] = true;
            }
        }
        self.primes.extend(
            composite
                .iter()
                .enumerate()
                .filter(|&(_, &marked)| !marked)
                .map(|(offset, _)| low + offset as u64)
                .filter(|&candidate| candidate >= 2),
        );

        let event = GrowthEvent {
            old_frontier: self.frontier,
            new_frontier: target,
        };
        log::debug!(
            "sieved {} -> {} ({} primes known)",
            event.old_frontier,
            event.new_frontier,
            self.primes.len()
        );
        self.frontier = target;
        self.extensions += 1;
        self.pending.push(event);
    }

    /// Whether `n` is prime, sieving up to `n` first if needed.
    pub fn is_prime(&mut self, n: u64) -> Result<bool, ArithError> {
        if n < 2 {
            return Ok(false);
        }
        self.ensure_frontier(n)?;
        Ok(self.primes.binary_search(&n).is_ok())
    }

    /// Whether `n` is composite. Only sieves up to sqrt(n).
    pub fn is_composite(&mut self, n: u64) -> Result<bool, ArithError> {
        if n < 4 {
            return Ok(false);
        }
        Ok(self.smallest_prime_factor(n)? != n)
    }

    /// Decide primality from the known primes alone, without sieving.
    pub fn probe(&self, n: u64) -> Primality {
        if n < 2 {
            return Primality::Composite;
        }
        if n <= self.frontier {
            return match self.primes.binary_search(&n) {
                Ok(_) => Primality::Prime,
                Err(_) => Primality::Composite,
            };
        }
        for &p in &self.primes {
            if p > n / p {
                return Primality::Prime;
            }
            if n % p == 0 {
                return Primality::Composite;
            }
        }
        if self.frontier >= n.sqrt() {
            Primality::Prime
        } else {
            Primality::Unknown
        }
    }

    /// The `k`-th prime, counting 2 as the first. On failure the registry is
    /// left as it was before the call.
    pub fn nth_prime(&mut self, k: usize) -> Result<u64, ArithError> {
        if k == 0 {
            return Err(ArithError::Domain {
                function: "nth_prime",
                value: 0,
            });
        }
        let checkpoint = self.checkpoint();
        while self.primes.len() < k {
            let bound = nth_prime_upper_bound(k);
            if self.frontier >= self.ceiling {
                self.rollback(checkpoint);
                return Err(ArithError::PrimeBoundExceeded {
                    requested: bound,
                    ceiling: self.ceiling,
                });
            }
            let needed = bound.min(self.ceiling).max(self.frontier + 1);
            self.ensure_frontier(needed)?;
        }
        Ok(self.primes[k - 1])
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            primes: self.primes.len(),
            frontier: self.frontier,
            extensions: self.extensions,
            pending: self.pending.len(),
        }
    }

    /// Forget every extension made since `checkpoint`.
    fn rollback(&mut self, checkpoint: Checkpoint) {
        log::debug!(
            "rolling back sieve from {} to {}",
            self.frontier,
            checkpoint.frontier
        );
        self.primes.truncate(checkpoint.primes);
        self.frontier = checkpoint.frontier;
        self.extensions = checkpoint.extensions;
        self.pending.truncate(checkpoint.pending);
    }

    /// All primes up to and including `limit`.
    pub fn primes_up_to(&mut self, limit: u64) -> Result<&[u64], ArithError> {
        self.ensure_frontier(limit)?;
        let end = self.primes.partition_point(|&p| p <= limit);
        Ok(&self.primes[..end])
    }

    /// Least prime dividing `n` (which is `n` itself when `n` is prime).
    ///
    /// Never sieves past sqrt(n), apart from the doubling headroom.
    pub fn smallest_prime_factor(&mut self, n: u64) -> Result<u64, ArithError> {
        if n < 2 {
            return Err(ArithError::Domain {
                function: "smallest_prime_factor",
                value: n,
            });
        }
        self.least_factor_from(n, 0).map(|(p, _)| p)
    }

    /// Smallest prime factor of `n` among the primes at `index` and beyond.
    ///
    /// The caller guarantees no prime before `index` divides `n`. Returns the
    /// factor and the index to resume from.
    fn least_factor_from(&mut self, n: u64, mut index: usize) -> Result<(u64, usize), ArithError> {
        loop {
            while let Some(&p) = self.primes.get(index) {
                if p > n / p {
                    return Ok((n, index));
                }
                if n % p == 0 {
                    return Ok((p, index));
                }
                index += 1;
            }
            let root = n.sqrt();
            if self.frontier >= root {
                return Ok((n, index));
            }
            self.ensure_frontier(root)?;
        }
    }

    /// Prime factorization of `n` by repeated smallest-prime-factor division.
    pub fn factorize(&mut self, n: u64) -> Result<Factorization, ArithError> {
        if n == 0 {
            return Err(ArithError::Domain {
                function: "factorize",
                value: 0,
            });
        }
        let mut remaining = n;
        let mut index = 0;
        let mut factors = Vec::new();
        while remaining > 1 {
            let (p, at) = self.least_factor_from(remaining, index)?;
            let mut exponent = 0u32;
            while remaining % p == 0 {
                remaining /= p;
                exponent += 1;
            }
            factors.push((p, exponent));
            index = at + 1;
        }
        Ok(Factorization::from_ascending(factors))
    }
}

/// Registry position to return to when a multi-step extension fails.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    primes: usize,
    frontier: u64,
    extensions: usize,
    pending: usize,
}

/// An integer no smaller than the `k`-th prime (Rosser's bound for k >= 6).
fn nth_prime_upper_bound(k: usize) -> u64 {
    if k < 6 {
        return 13;
    }
    let k = k as f64;
    (k * (k.ln() + k.ln().ln())).ceil() as u64
}
