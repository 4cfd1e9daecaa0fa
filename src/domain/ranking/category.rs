//! RankingCategory enum naming the poll list views.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// The named orderings over the poll collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCategory {
    /// Most total votes first.
    Trending,
    /// Most total votes first; currently identical to `Trending`.
    Top,
    /// Newest first.
    #[default]
    Latest,
    /// Polls with at least one vote, in random order.
    Featured,
}

impl RankingCategory {
    /// Returns all categories in display order.
    pub fn all() -> &'static [RankingCategory] {
        &[
            RankingCategory::Trending,
            RankingCategory::Top,
            RankingCategory::Latest,
            RankingCategory::Featured,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingCategory::Trending => "trending",
            RankingCategory::Top => "top",
            RankingCategory::Latest => "latest",
            RankingCategory::Featured => "featured",
        }
    }
}

impl fmt::Display for RankingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RankingCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trending" => Ok(RankingCategory::Trending),
            "top" => Ok(RankingCategory::Top),
            "latest" => Ok(RankingCategory::Latest),
            "featured" => Ok(RankingCategory::Featured),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown ranking category '{}'", other),
            )),
        }
    }
}
