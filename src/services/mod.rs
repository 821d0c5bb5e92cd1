pub mod aggregate_reporter;
pub mod candidate_scanner;
pub mod feedback_augmentor;
pub mod llm_service;
pub mod score_extractor;

pub use aggregate_reporter::{AggregateReporter, GradingReport, RenderMode, RenderStrategy};
pub use candidate_scanner::CandidateScanner;
pub use feedback_augmentor::{FeedbackAugmentor, FeedbackOutcome};
pub use llm_service::{FeedbackGenerator, LlmService};
pub use score_extractor::extract_points;
