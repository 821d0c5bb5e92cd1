pub mod candidate;
pub mod score;
pub mod summary;

pub use candidate::{display_name, CandidateFolder};
pub use score::{rank, ScoreRecord};
pub use summary::AggregateSummary;
