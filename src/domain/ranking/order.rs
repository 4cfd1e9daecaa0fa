//! Random ordering sources for the featured view.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::poll::Poll;

/// Reorders the featured polls in place.
///
/// Any `Fn(&mut [Poll])` closure can be used as an order.
pub trait FeaturedOrder: Send + Sync {
    fn reorder(&self, polls: &mut [Poll]);
}

impl<F> FeaturedOrder for F
where
    F: Fn(&mut [Poll]) + Send + Sync,
{
    fn reorder(&self, polls: &mut [Poll]) {
        self(polls)
    }
}

/// Non-reproducible shuffle backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrder;

impl FeaturedOrder for RandomOrder {
    fn reorder(&self, polls: &mut [Poll]) {
        polls.shuffle(&mut rand::thread_rng());
    }
}

/// Deterministic shuffle; two instances with the same seed produce the
/// same sequence of orderings.
#[derive(Debug)]
pub struct SeededOrder {
    rng: Mutex<StdRng>,
}

impl SeededOrder {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl FeaturedOrder for SeededOrder {
    fn reorder(&self, polls: &mut [Poll]) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        polls.shuffle(&mut *rng);
    }
}
