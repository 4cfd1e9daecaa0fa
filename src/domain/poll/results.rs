//! Per-poll result summaries.

use serde::Serialize;

use crate::domain::foundation::{OptionId, PollId};

use super::Poll;

/// Vote tally for a single option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResult {
    pub option_id: OptionId,
    pub text: String,
    pub votes: u64,
    /// Share of the poll's total votes, 0.0 to 100.0.
    pub percentage: f64,
}

/// Results view of a poll, options in poll order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResults {
    pub poll_id: PollId,
    pub question: String,
    pub total_votes: u64,
    pub options: Vec<OptionResult>,
    /// Options tied for the highest count; empty while nobody has voted.
    pub leaders: Vec<OptionId>,
}

impl PollResults {
    pub fn from_poll(poll: &Poll) -> Self {
        let total_votes = poll.total_votes();

        let options = poll
            .options()
            .iter()
            .map(|option| OptionResult {
                option_id: option.id().clone(),
                text: option.text().to_string(),
                votes: option.votes(),
                percentage: percentage(option.votes(), total_votes),
            })
            .collect();

        let max_votes = poll.options().iter().map(|o| o.votes()).max().unwrap_or(0);
        let leaders = if max_votes == 0 {
            Vec::new()
        } else {
            poll.options()
                .iter()
                .filter(|o| o.votes() == max_votes)
                .map(|o| o.id().clone())
                .collect()
        };

        Self {
            poll_id: poll.id().clone(),
            question: poll.question().to_string(),
            total_votes,
            options,
            leaders,
        }
    }
}

fn percentage(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 / total as f64 * 100.0
    }
}
