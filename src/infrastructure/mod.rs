//! 基础设施层
//!
//! 只暴露能力（等待、随机数），不认识候选人和报告

pub mod clock;
pub mod random;

pub use clock::{Clock, RecordingClock, TokioClock};
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
