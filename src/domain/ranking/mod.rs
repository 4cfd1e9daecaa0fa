//! Ranking Module - Pure ordering of polls into category views.
//!
//! # Components
//!
//! - `RankingCategory` - The named views (trending, top, latest, featured)
//! - `rank` / `RankingEngine` - Sort, filter and truncate a poll slice
//! - `FeaturedOrder` - Injectable shuffle for the featured view
//!
//! Trending and top currently rank identically (total votes, descending).

mod category;
mod engine;
mod order;

pub use category::RankingCategory;
pub use engine::{rank, RankingEngine};
pub use order::{FeaturedOrder, RandomOrder, SeededOrder};
