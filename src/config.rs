//! Catalog configuration
//!
//! Settings applied to nodes as they are lazily created. A single config is
//! shared by every node beneath a [`Catalog`](crate::catalog::Catalog).

use crate::catalog::types::Algorithm;
use std::time::Duration;

/// Default capacity hint for each child mapping
pub const DEFAULT_CAPACITY: usize = 8;

/// Catalog configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Session duration given to a newly created scope
    pub default_session_duration: Option<Duration>,
    /// Algorithm given to a newly created token
    pub default_token_algorithm: Algorithm,
    /// Capacity hint for each child mapping
    pub initial_capacity: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_session_duration: None,
            default_token_algorithm: Algorithm::Hs512,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CatalogConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session duration for new scopes
    pub fn default_session_duration(mut self, duration: Duration) -> Self {
        self.default_session_duration = Some(duration);
        self
    }

    /// Set the algorithm for new tokens
    pub fn default_token_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.default_token_algorithm = algorithm;
        self
    }

    /// Set the capacity hint for child mappings
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = CatalogConfig::new()
            .default_session_duration(Duration::from_secs(3600))
            .default_token_algorithm(Algorithm::Rs256)
            .initial_capacity(32);

        assert_eq!(
            config.default_session_duration,
            Some(Duration::from_secs(3600))
        );
        assert_eq!(config.default_token_algorithm, Algorithm::Rs256);
        assert_eq!(config.initial_capacity, 32);
    }

    #[test]
    fn test_config_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.default_session_duration, None);
        assert_eq!(config.default_token_algorithm, Algorithm::Hs512);
        assert_eq!(config.initial_capacity, DEFAULT_CAPACITY);
    }
}
