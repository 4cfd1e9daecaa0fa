//! Poll domain module.
//!
//! Polls are created once, keep their question and options forever, and
//! only accumulate votes. Results views and the demo seed live here too.

mod aggregate;
mod demo;
mod errors;
mod results;

pub use aggregate::{Poll, PollOption, MAX_OPTIONS, MIN_OPTIONS};
pub use demo::demo_polls;
pub use errors::PollError;
pub use results::{OptionResult, PollResults};
