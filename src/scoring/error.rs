use thiserror::Error;

/// Conditions under which the engine refuses to produce a breakdown.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("no active judges: every judge is excluded from scoring")]
    NoActiveJudges,

    #[error("judge '{judge}' has no special criteria scores")]
    EmptySpecialCriteria { judge: String },
}
