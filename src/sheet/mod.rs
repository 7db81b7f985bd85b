pub mod input;
pub mod storage;
pub mod types;

pub use input::{parse_control_constant, parse_count, parse_score};
pub use storage::{load_sheet, parse_sheet, SheetFile};
pub use types::{AudienceTally, Judge, JudgeField, JudgeId};

use crate::scoring::{compute_score, ScoreBreakdown, ScoringConfig, ScoringError};

/// The editable state of one contestant's score sheet.
///
/// Holds at least one judge at all times, and every judge holds at least one
/// special criterion. Edits never mutate a judge in place; the judge is
/// rebuilt with the changed field and put back at the same position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSheet {
    judges: Vec<Judge>,
    pub audience: AudienceTally,
    pub control_constant: f64,
    next_id: u64,
}

impl ScoreSheet {
    /// Create a sheet with `judge_count` blank judges (at least one).
    pub fn new(judge_count: usize, config: &ScoringConfig) -> Self {
        let mut sheet = Self {
            judges: Vec::new(),
            audience: AudienceTally::default(),
            control_constant: config.control_constant,
            next_id: 1,
        };
        for _ in 0..judge_count.max(1) {
            sheet.add_judge();
        }
        sheet
    }

    /// Build a sheet from prepared judges. Returns `None` if `judges` is empty
    /// or any judge has no special criteria.
    pub fn from_judges(
        judges: Vec<Judge>,
        audience: AudienceTally,
        control_constant: f64,
    ) -> Option<Self> {
        if judges.is_empty() || judges.iter().any(|j| j.special_criteria.is_empty()) {
            return None;
        }
        let next_id = judges.iter().map(|j| j.id.0).max().unwrap_or(0) + 1;
        Some(Self {
            judges,
            audience,
            control_constant,
            next_id,
        })
    }

    pub fn judges(&self) -> &[Judge] {
        &self.judges
    }

    pub fn judge(&self, id: JudgeId) -> Option<&Judge> {
        self.judges.iter().find(|j| j.id == id)
    }

    pub fn position(&self, id: JudgeId) -> Option<usize> {
        self.judges.iter().position(|j| j.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.judges.iter().filter(|j| j.is_active()).count()
    }

    /// Append a blank judge named after its position.
    pub fn add_judge(&mut self) -> JudgeId {
        let id = JudgeId(self.next_id);
        self.next_id += 1;
        let name = format!("Judge {}", self.judges.len() + 1);
        self.judges.push(Judge::new(id, name));
        id
    }

    /// Remove a judge. The last remaining judge cannot be removed.
    pub fn remove_judge(&mut self, id: JudgeId) -> bool {
        if self.judges.len() <= 1 {
            return false;
        }
        match self.position(id) {
            Some(pos) => {
                self.judges.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replace one attribute of a judge.
    pub fn update_judge(&mut self, id: JudgeId, field: JudgeField) -> bool {
        self.replace_judge(id, |judge| judge.with_field(field))
    }

    /// Append a zero-valued special criterion to a judge.
    pub fn add_criterion(&mut self, id: JudgeId) -> bool {
        self.replace_judge(id, |judge| {
            let mut next = judge.clone();
            next.special_criteria.push(0.0);
            next
        })
    }

    /// Drop a judge's last special criterion, never going below one.
    pub fn remove_last_criterion(&mut self, id: JudgeId) -> bool {
        match self.judge(id) {
            Some(judge) if judge.special_criteria.len() > 1 => {}
            _ => return false,
        }
        self.replace_judge(id, |judge| {
            let mut next = judge.clone();
            next.special_criteria.pop();
            next
        })
    }

    pub fn update_criterion(&mut self, id: JudgeId, index: usize, value: f64) -> bool {
        match self.judge(id) {
            Some(judge) if index < judge.special_criteria.len() => {}
            _ => return false,
        }
        self.replace_judge(id, |judge| {
            let mut next = judge.clone();
            next.special_criteria[index] = value;
            next
        })
    }

    pub fn set_voters(&mut self, voters: u64) {
        self.audience.voters = voters;
    }

    pub fn set_points(&mut self, points: u64) {
        self.audience.points = points;
    }

    pub fn set_control_constant(&mut self, control_constant: f64) {
        self.control_constant = control_constant;
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig::with_control_constant(self.control_constant)
    }

    /// Run the scoring engine on the current state.
    pub fn calculate(&self) -> Result<ScoreBreakdown, ScoringError> {
        compute_score(&self.judges, &self.audience, &self.scoring_config())
    }

    fn replace_judge<F>(&mut self, id: JudgeId, rebuild: F) -> bool
    where
        F: FnOnce(&Judge) -> Judge,
    {
        match self.position(id) {
            Some(pos) => {
                let next = rebuild(&self.judges[pos]);
                self.judges[pos] = next;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(judges: usize) -> ScoreSheet {
        ScoreSheet::new(judges, &ScoringConfig::default())
    }

    #[test]
    fn test_new_sheet_has_at_least_one_judge() {
        let s = sheet(0);
        assert_eq!(s.judges().len(), 1);
        assert_eq!(s.judges()[0].name, "Judge 1");
        assert_eq!(s.control_constant, 20.0);
    }

    #[test]
    fn test_add_judge_assigns_unique_ids() {
        let mut s = sheet(1);
        let a = s.add_judge();
        let b = s.add_judge();
        assert_ne!(a, b);
        assert_eq!(s.judges().len(), 3);
        assert_eq!(s.judges()[2].name, "Judge 3");
    }

    #[test]
    fn test_cannot_remove_last_judge() {
        let mut s = sheet(1);
        let id = s.judges()[0].id;
        assert!(!s.remove_judge(id));
        assert_eq!(s.judges().len(), 1);
    }

    #[test]
    fn test_remove_judge() {
        let mut s = sheet(3);
        let middle = s.judges()[1].id;
        assert!(s.remove_judge(middle));
        assert_eq!(s.judges().len(), 2);
        assert!(s.judge(middle).is_none());
    }

    #[test]
    fn test_remove_unknown_judge() {
        let mut s = sheet(2);
        assert!(!s.remove_judge(JudgeId(999)));
    }

    #[test]
    fn test_update_judge_keeps_position() {
        let mut s = sheet(3);
        let id = s.judges()[1].id;
        assert!(s.update_judge(id, JudgeField::Quality(9.0)));
        assert_eq!(s.judges()[1].quality, 9.0);
        assert_eq!(s.judges()[1].id, id);
        assert_eq!(s.judges()[0].quality, 0.0);
    }

    #[test]
    fn test_criteria_never_below_one() {
        let mut s = sheet(1);
        let id = s.judges()[0].id;
        assert!(!s.remove_last_criterion(id));

        assert!(s.add_criterion(id));
        assert!(s.update_criterion(id, 1, 6.0));
        assert_eq!(s.judges()[0].special_criteria, vec![0.0, 6.0]);

        assert!(s.remove_last_criterion(id));
        assert_eq!(s.judges()[0].special_criteria, vec![0.0]);
        assert!(!s.remove_last_criterion(id));
    }

    #[test]
    fn test_update_criterion_out_of_range() {
        let mut s = sheet(1);
        let id = s.judges()[0].id;
        assert!(!s.update_criterion(id, 3, 5.0));
    }

    #[test]
    fn test_from_judges_rejects_empty() {
        assert!(ScoreSheet::from_judges(vec![], AudienceTally::default(), 20.0).is_none());

        let mut judge = Judge::new(JudgeId(1), "A");
        judge.special_criteria.clear();
        assert!(ScoreSheet::from_judges(vec![judge], AudienceTally::default(), 20.0).is_none());
    }

    #[test]
    fn test_from_judges_continues_ids() {
        let judges = vec![Judge::new(JudgeId(4), "A"), Judge::new(JudgeId(9), "B")];
        let mut s = ScoreSheet::from_judges(judges, AudienceTally::default(), 20.0).unwrap();
        assert_eq!(s.add_judge(), JudgeId(10));
    }

    #[test]
    fn test_calculate_uses_sheet_state() {
        let mut s = sheet(1);
        let id = s.judges()[0].id;
        s.update_judge(id, JudgeField::Creativity(8.0));
        s.update_judge(id, JudgeField::Quality(6.0));
        s.update_criterion(id, 0, 7.0);

        let breakdown = s.calculate().unwrap();
        assert!((breakdown.final_score - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_all_excluded() {
        let mut s = sheet(1);
        let id = s.judges()[0].id;
        s.update_judge(id, JudgeField::Excluded(true));
        assert_eq!(s.calculate(), Err(ScoringError::NoActiveJudges));
    }
}
