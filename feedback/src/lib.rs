//! Renders feedback Markdown in which fenced code blocks tagged with
//! `af_hide`, `af_when_passed`, `af_when_failed`, `af_when_substring` or
//! `af_when_regex` are shown or hidden depending on the outcome of a test.

mod condition;
mod error;
mod highlight;
mod pattern;
mod render;

pub use condition::Condition;
pub use error::{FeedbackError, Result};
pub use pattern::DelimitedPattern;
pub use render::{render_feedback, FeedbackRenderer, RenderOptions, DEFAULT_MAX_DEPTH};
