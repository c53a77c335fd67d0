// Services module - outbound integrations

pub mod submission;

pub use submission::{HttpSubmissionSink, SubmissionError, SubmissionOutcome, SubmissionSink};
