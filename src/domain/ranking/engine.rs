//! Ranking engine - ordered views over a poll collection.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::domain::poll::Poll;

use super::{FeaturedOrder, RandomOrder, RankingCategory, SeededOrder};

/// Ranks polls for a category and truncates to `limit`.
///
/// The input is never modified. Sorts are stable, so ties keep their input
/// order. `limit` of `None` or `Some(0)` returns the full ranking.
pub fn rank(
    polls: &[Poll],
    category: RankingCategory,
    limit: Option<usize>,
    order: &dyn FeaturedOrder,
) -> Vec<Poll> {
    let mut ranked: Vec<Poll> = match category {
        RankingCategory::Trending | RankingCategory::Top => {
            let mut ranked = polls.to_vec();
            ranked.sort_by_key(|poll| Reverse(poll.total_votes()));
            ranked
        }
        RankingCategory::Latest => {
            let mut ranked = polls.to_vec();
            ranked.sort_by(|a, b| b.created_at().cmp(a.created_at()));
            ranked
        }
        RankingCategory::Featured => {
            let mut ranked: Vec<Poll> = polls
                .iter()
                .filter(|poll| poll.total_votes() > 0)
                .cloned()
                .collect();
            order.reorder(&mut ranked);
            ranked
        }
    };

    if let Some(limit) = limit.filter(|limit| *limit > 0) {
        ranked.truncate(limit);
    }
    ranked
}

/// Ranking engine bound to a featured ordering source.
#[derive(Clone)]
pub struct RankingEngine {
    order: Arc<dyn FeaturedOrder>,
}

impl RankingEngine {
    pub fn new(order: Arc<dyn FeaturedOrder>) -> Self {
        Self { order }
    }

    /// Engine whose featured view is shuffled non-reproducibly.
    pub fn random() -> Self {
        Self::new(Arc::new(RandomOrder))
    }

    /// Engine whose featured view is shuffled from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Arc::new(SeededOrder::new(seed)))
    }

    pub fn rank(&self, polls: &[Poll], category: RankingCategory, limit: Option<usize>) -> Vec<Poll> {
        rank(polls, category, limit, self.order.as_ref())
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self::random()
    }
}

impl std::fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingEngine").finish_non_exhaustive()
    }
}
