//! Demo dataset used to seed an empty store.

use crate::domain::foundation::{OptionId, PollId, Timestamp};

use super::{Poll, PollOption, PollError};

struct DemoPoll {
    id: &'static str,
    question: &'static str,
    options: &'static [(&'static str, u64)],
    age_days: i64,
    cover_image: &'static str,
}

const DEMO_POLLS: &[DemoPoll] = &[
    DemoPoll {
        id: "1",
        question: "What's your favorite programming language?",
        options: &[
            ("JavaScript", 12),
            ("Python", 9),
            ("TypeScript", 15),
            ("Java", 7),
            ("C#", 5),
        ],
        age_days: 1,
        cover_image: "https://source.unsplash.com/photo-1487058792275-0ad4aaf24ca7",
    },
    DemoPoll {
        id: "2",
        question: "Which UI framework do you prefer?",
        options: &[("React", 18), ("Vue", 10), ("Angular", 6), ("Svelte", 8)],
        age_days: 2,
        cover_image: "https://source.unsplash.com/photo-1561883088-039e53143d73",
    },
];

/// Builds the demo polls with creation times relative to `now`.
pub fn demo_polls(now: Timestamp) -> Result<Vec<Poll>, PollError> {
    DEMO_POLLS
        .iter()
        .map(|demo| {
            let id = PollId::new(demo.id).map_err(|e| PollError::corrupt(e.to_string()))?;
            let options = demo
                .options
                .iter()
                .enumerate()
                .map(|(index, (text, votes))| {
                    PollOption::reconstitute(
                        OptionId::for_position(&id, index),
                        text.to_string(),
                        *votes,
                    )
                })
                .collect();
            Ok(Poll::reconstitute(
                id,
                demo.question.to_string(),
                options,
                now.minus_days(demo.age_days),
                None,
                Some(demo.cover_image.to_string()),
            ))
        })
        .collect()
}
