pub mod bias;
pub mod config;
pub mod engine;
pub mod error;
pub mod validation;

pub use bias::{BiasFlag, BiasReading};
pub use config::*;
pub use engine::{
    compute_score, effective_control_constant, JudgeScore, ScoreBreakdown, AUDIENCE_WEIGHT,
    JUDGES_WEIGHT, M_PER_JUDGE,
};
pub use error::ScoringError;
pub use validation::validate_scoring;
