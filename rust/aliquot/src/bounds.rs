//! Resource ceilings for a single aliquot run.

use std::path::Path;

use arith_core::{RegistryConfig, DEFAULT_SEED_FRONTIER};
use serde::{Deserialize, Serialize};

/// Ceilings checked before each step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliquotBounds {
    /// A run stops once its trajectory holds more than this many terms.
    pub max_length: usize,
    /// Largest permissible term.
    pub max_value: u64,
    /// Largest frontier the prime registry may sieve to during the run.
    pub max_prime: u64,
}

impl Default for AliquotBounds {
    fn default() -> Self {
        Self {
            max_length: 50,
            max_value: 100_000,
            max_prime: 100_000,
        }
    }
}

/// Errors from loading or validating bounds.
#[derive(Debug, thiserror::Error)]
pub enum BoundsError {
    #[error("bound {0} must be at least 1")]
    Invalid(&'static str),

    #[error("failed to parse bounds: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AliquotBounds {
    pub fn new(max_length: usize, max_value: u64, max_prime: u64) -> Self {
        Self {
            max_length,
            max_value,
            max_prime,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_value(mut self, max_value: u64) -> Self {
        self.max_value = max_value;
        self
    }

    pub fn with_max_prime(mut self, max_prime: u64) -> Self {
        self.max_prime = max_prime;
        self
    }

    /// Reject zero ceilings.
    pub fn validate(&self) -> Result<(), BoundsError> {
        if self.max_length == 0 {
            return Err(BoundsError::Invalid("max_length"));
        }
        if self.max_value == 0 {
            return Err(BoundsError::Invalid("max_value"));
        }
        if self.max_prime == 0 {
            return Err(BoundsError::Invalid("max_prime"));
        }
        Ok(())
    }

    /// Config for a registry able to sieve as far as `max_prime` allows.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            seed_frontier: DEFAULT_SEED_FRONTIER.min(self.max_prime),
            ceiling: self.max_prime,
        }
    }

    /// Load bounds from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BoundsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let bounds: AliquotBounds = serde_json::from_str(&contents)?;
        bounds.validate()?;
        log::info!("Loaded bounds from {}: {:?}", path.display(), bounds);
        Ok(bounds)
    }
}
