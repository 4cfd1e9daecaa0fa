//! Ranking configuration

use serde::Deserialize;

use crate::domain::ranking::RankingEngine;

/// Ranking configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfig {
    /// Seed for the featured shuffle; unset means non-reproducible
    pub featured_seed: Option<u64>,

    /// Limit applied to ranked views when the caller gives none
    pub default_limit: Option<usize>,
}

impl RankingConfig {
    /// Build the ranking engine this configuration describes
    pub fn engine(&self) -> RankingEngine {
        match self.featured_seed {
            Some(seed) => RankingEngine::seeded(seed),
            None => RankingEngine::random(),
        }
    }
}
