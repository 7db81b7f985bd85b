use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque judge identity, stable across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JudgeId(pub u64);

impl fmt::Display for JudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One judge's ratings for the contestant.
///
/// Scores are meant to be in 0-10 but the range is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judge {
    pub id: JudgeId,
    pub name: String,
    pub creativity: f64,
    pub quality: f64,
    pub special_criteria: Vec<f64>,
    pub half_weight: bool,
    pub excluded: bool,
}

impl Judge {
    /// A blank judge: zero scores and a single zero criterion.
    pub fn new(id: JudgeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            creativity: 0.0,
            quality: 0.0,
            special_criteria: vec![0.0],
            half_weight: false,
            excluded: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.excluded
    }

    /// Copy of this judge with one attribute replaced.
    pub fn with_field(&self, field: JudgeField) -> Self {
        let mut judge = self.clone();
        match field {
            JudgeField::Name(name) => judge.name = name,
            JudgeField::Creativity(v) => judge.creativity = v,
            JudgeField::Quality(v) => judge.quality = v,
            JudgeField::HalfWeight(on) => judge.half_weight = on,
            JudgeField::Excluded(on) => judge.excluded = on,
        }
        judge
    }
}

/// A single editable judge attribute together with its new value.
#[derive(Debug, Clone, PartialEq)]
pub enum JudgeField {
    Name(String),
    Creativity(f64),
    Quality(f64),
    HalfWeight(bool),
    Excluded(bool),
}

/// Audience vote totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudienceTally {
    pub voters: u64,
    pub points: u64,
}

impl AudienceTally {
    pub fn new(voters: u64, points: u64) -> Self {
        Self { voters, points }
    }
}
