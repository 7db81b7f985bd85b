use crate::scoring::{ScoreBreakdown, ScoringError};
use crate::sheet::{parse_control_constant, parse_count, parse_score, JudgeField, JudgeId, ScoreSheet};
use crate::tui::theme::ThemeColors;
use std::collections::VecDeque;
use std::time::Instant;

const MAX_UNDO: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Help,
    Formulas,
}

/// One row of the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    JudgeName(JudgeId),
    Creativity(JudgeId),
    Quality(JudgeId),
    Criterion(JudgeId, usize),
    HalfWeight(JudgeId),
    Excluded(JudgeId),
    Voters,
    Points,
    ControlConstant,
}

impl FormField {
    pub fn judge_id(&self) -> Option<JudgeId> {
        match *self {
            FormField::JudgeName(id)
            | FormField::Creativity(id)
            | FormField::Quality(id)
            | FormField::Criterion(id, _)
            | FormField::HalfWeight(id)
            | FormField::Excluded(id) => Some(id),
            FormField::Voters | FormField::Points | FormField::ControlConstant => None,
        }
    }

    pub fn is_toggle(&self) -> bool {
        matches!(self, FormField::HalfWeight(_) | FormField::Excluded(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FormField::JudgeName(_))
    }
}

/// Flatten a sheet into the ordered list of form rows.
pub fn build_fields(sheet: &ScoreSheet) -> Vec<FormField> {
    let mut fields = Vec::new();
    for judge in sheet.judges() {
        fields.push(FormField::JudgeName(judge.id));
        fields.push(FormField::Creativity(judge.id));
        fields.push(FormField::Quality(judge.id));
        for i in 0..judge.special_criteria.len() {
            fields.push(FormField::Criterion(judge.id, i));
        }
        fields.push(FormField::HalfWeight(judge.id));
        fields.push(FormField::Excluded(judge.id));
    }
    fields.push(FormField::Voters);
    fields.push(FormField::Points);
    fields.push(FormField::ControlConstant);
    fields
}

pub struct App {
    pub sheet: ScoreSheet,
    pub fields: Vec<FormField>,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub result: Option<Result<ScoreBreakdown, ScoringError>>,
    pub result_stale: bool,
    pub flash_message: Option<(String, Instant)>,
    pub undo_stack: VecDeque<ScoreSheet>,
    pub should_quit: bool,
    pub theme: ThemeColors,
}

impl App {
    pub fn new(sheet: ScoreSheet) -> Self {
        let fields = build_fields(&sheet);
        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(Some(0));

        Self {
            sheet,
            fields,
            table_state,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            result: None,
            result_stale: false,
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            theme: ThemeColors::dark(),
        }
    }

    pub fn selected_field(&self) -> Option<FormField> {
        self.table_state
            .selected()
            .and_then(|i| self.fields.get(i).copied())
    }

    pub fn selected_judge(&self) -> Option<JudgeId> {
        self.selected_field().and_then(|f| f.judge_id())
    }

    pub fn next_row(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.fields.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.fields.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    /// Label shown in the first column of a form row.
    pub fn field_label(&self, field: FormField) -> String {
        match field {
            FormField::JudgeName(id) => {
                let pos = self.sheet.position(id).map(|p| p + 1).unwrap_or(0);
                format!("Judge {}", pos)
            }
            FormField::Creativity(_) => "  Creativity (0-10)".to_string(),
            FormField::Quality(_) => "  Quality (0-10)".to_string(),
            FormField::Criterion(_, i) => format!("  Criteria {}", i + 1),
            FormField::HalfWeight(_) => "  Half weight".to_string(),
            FormField::Excluded(_) => "  Excluded".to_string(),
            FormField::Voters => "Number of voters".to_string(),
            FormField::Points => "Total audience points".to_string(),
            FormField::ControlConstant => "Control constant (M₀)".to_string(),
        }
    }

    /// Current value of a form row, as displayed.
    pub fn field_value(&self, field: FormField) -> String {
        let judge = field.judge_id().and_then(|id| self.sheet.judge(id));
        let yes_no = |on: bool| (if on { "[x]" } else { "[ ]" }).to_string();
        match (field, judge) {
            (FormField::JudgeName(_), Some(j)) => j.name.clone(),
            (FormField::Creativity(_), Some(j)) => trim_float(j.creativity),
            (FormField::Quality(_), Some(j)) => trim_float(j.quality),
            (FormField::Criterion(_, i), Some(j)) => j
                .special_criteria
                .get(i)
                .map(|v| trim_float(*v))
                .unwrap_or_default(),
            (FormField::HalfWeight(_), Some(j)) => yes_no(j.half_weight),
            (FormField::Excluded(_), Some(j)) => yes_no(j.excluded),
            (FormField::Voters, _) => self.sheet.audience.voters.to_string(),
            (FormField::Points, _) => self.sheet.audience.points.to_string(),
            (FormField::ControlConstant, _) => trim_float(self.sheet.control_constant),
            (_, None) => String::new(),
        }
    }

    pub fn push_undo(&mut self) {
        self.undo_stack.push_front(self.sheet.clone());
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Enter on a row: toggles flip immediately, other rows open the editor.
    pub fn start_editing(&mut self) {
        let field = match self.selected_field() {
            Some(f) => f,
            None => return,
        };
        if field.is_toggle() {
            self.toggle_selected();
            return;
        }
        self.edit_buffer = self.field_value(field);
        self.input_mode = InputMode::Editing;
    }

    /// Apply the edit buffer to the selected row.
    pub fn confirm_edit(&mut self) {
        let field = match self.selected_field() {
            Some(f) => f,
            None => {
                self.cancel_edit();
                return;
            }
        };

        let raw = std::mem::take(&mut self.edit_buffer);
        self.input_mode = InputMode::Normal;
        self.push_undo();

        let applied = match field {
            FormField::JudgeName(id) => {
                let name = raw.trim();
                if name.is_empty() {
                    false
                } else {
                    self.sheet.update_judge(id, JudgeField::Name(name.to_string()))
                }
            }
            FormField::Creativity(id) => self
                .sheet
                .update_judge(id, JudgeField::Creativity(parse_score(&raw))),
            FormField::Quality(id) => self
                .sheet
                .update_judge(id, JudgeField::Quality(parse_score(&raw))),
            FormField::Criterion(id, i) => self.sheet.update_criterion(id, i, parse_score(&raw)),
            FormField::Voters => {
                self.sheet.set_voters(parse_count(&raw));
                true
            }
            FormField::Points => {
                self.sheet.set_points(parse_count(&raw));
                true
            }
            FormField::ControlConstant => {
                self.sheet.set_control_constant(parse_control_constant(&raw));
                true
            }
            FormField::HalfWeight(_) | FormField::Excluded(_) => false,
        };

        if applied {
            tracing::debug!(?field, value = %raw, "field updated");
            self.mark_stale();
        } else {
            self.undo_stack.pop_front();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }

    /// Flip the selected half-weight or excluded checkbox.
    pub fn toggle_selected(&mut self) {
        let field = match self.selected_field() {
            Some(f) if f.is_toggle() => f,
            _ => return,
        };
        let judge = match field.judge_id().and_then(|id| self.sheet.judge(id)) {
            Some(j) => j.clone(),
            None => return,
        };

        self.push_undo();
        let update = match field {
            FormField::HalfWeight(_) => JudgeField::HalfWeight(!judge.half_weight),
            _ => JudgeField::Excluded(!judge.excluded),
        };
        self.sheet.update_judge(judge.id, update);
        self.mark_stale();
    }

    pub fn add_judge(&mut self) {
        self.push_undo();
        let id = self.sheet.add_judge();
        self.rebuild_fields();
        self.select_field(FormField::JudgeName(id));
        self.mark_stale();
        self.show_flash(format!("Added judge {}", self.sheet.judges().len()));
    }

    pub fn remove_selected_judge(&mut self) {
        let id = match self.selected_judge() {
            Some(id) => id,
            None => return,
        };
        if self.sheet.judges().len() <= 1 {
            self.show_flash("Error: cannot remove the last judge".to_string());
            return;
        }

        self.push_undo();
        let name = self
            .sheet
            .judge(id)
            .map(|j| j.name.clone())
            .unwrap_or_default();
        if self.sheet.remove_judge(id) {
            self.rebuild_fields();
            self.mark_stale();
            self.show_flash(format!("Removed: {} (u to undo)", name));
        } else {
            self.undo_stack.pop_front();
        }
    }

    pub fn add_criterion(&mut self) {
        let id = match self.selected_judge() {
            Some(id) => id,
            None => return,
        };
        self.push_undo();
        if self.sheet.add_criterion(id) {
            self.rebuild_fields();
            let last = self
                .sheet
                .judge(id)
                .map(|j| j.special_criteria.len() - 1)
                .unwrap_or(0);
            self.select_field(FormField::Criterion(id, last));
            self.mark_stale();
        } else {
            self.undo_stack.pop_front();
        }
    }

    pub fn remove_criterion(&mut self) {
        let id = match self.selected_judge() {
            Some(id) => id,
            None => return,
        };
        self.push_undo();
        if self.sheet.remove_last_criterion(id) {
            self.rebuild_fields();
            self.mark_stale();
        } else {
            self.undo_stack.pop_front();
            self.show_flash("Error: a judge needs at least one criterion".to_string());
        }
    }

    /// Restore the sheet as it was before the last edit.
    pub fn undo_last(&mut self) {
        match self.undo_stack.pop_front() {
            Some(previous) => {
                self.sheet = previous;
                self.rebuild_fields();
                self.mark_stale();
                self.show_flash("Undid last change".to_string());
            }
            None => self.show_flash("Nothing to undo".to_string()),
        }
    }

    /// Recompute the breakdown from the current sheet, replacing any previous result.
    pub fn calculate(&mut self) {
        let result = self.sheet.calculate();
        match &result {
            Ok(breakdown) => {
                tracing::debug!(final_score = breakdown.final_score, "calculated");
                self.show_flash(format!("Calculated: final score {:.2}", breakdown.final_score));
            }
            Err(e) => self.show_flash(format!("Error: {}", e)),
        }
        self.result = Some(result);
        self.result_stale = false;
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn show_formulas(&mut self) {
        self.input_mode = InputMode::Formulas;
    }

    pub fn dismiss_overlay(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn mark_stale(&mut self) {
        if self.result.is_some() {
            self.result_stale = true;
        }
    }

    /// Rebuild rows after a structural change, keeping the selection in range.
    fn rebuild_fields(&mut self) {
        let previous = self.selected_field();
        self.fields = build_fields(&self.sheet);
        let index = previous
            .and_then(|f| self.fields.iter().position(|g| *g == f))
            .or_else(|| {
                self.table_state
                    .selected()
                    .map(|i| i.min(self.fields.len() - 1))
            })
            .unwrap_or(0);
        self.table_state.select(Some(index));
    }

    fn select_field(&mut self, field: FormField) {
        if let Some(pos) = self.fields.iter().position(|f| *f == field) {
            self.table_state.select(Some(pos));
        }
    }
}

/// Display a float without trailing zeros ("8", "7.5").
fn trim_float(value: f64) -> String {
    let s = format!("{}", value);
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;

    fn app(judges: usize) -> App {
        App::new(ScoreSheet::new(judges, &ScoringConfig::default()))
    }

    fn select(app: &mut App, field: FormField) {
        let pos = app.fields.iter().position(|f| *f == field).unwrap();
        app.table_state.select(Some(pos));
    }

    fn edit(app: &mut App, field: FormField, value: &str) {
        select(app, field);
        app.start_editing();
        app.edit_buffer = value.to_string();
        app.confirm_edit();
    }

    #[test]
    fn test_build_fields_layout() {
        let a = app(2);
        // 6 rows per judge with one criterion, plus 3 audience rows
        assert_eq!(a.fields.len(), 2 * 6 + 3);
        assert!(matches!(a.fields[0], FormField::JudgeName(_)));
        assert_eq!(a.fields[a.fields.len() - 1], FormField::ControlConstant);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut a = app(1);
        a.previous_row();
        assert_eq!(a.table_state.selected(), Some(a.fields.len() - 1));
        a.next_row();
        assert_eq!(a.table_state.selected(), Some(0));
    }

    #[test]
    fn test_edit_score_sanitizes_input() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        edit(&mut a, FormField::Creativity(id), "8.5");
        edit(&mut a, FormField::Quality(id), "abc");
        assert_eq!(a.sheet.judges()[0].creativity, 8.5);
        assert_eq!(a.sheet.judges()[0].quality, 0.0);
        assert_eq!(a.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_control_constant_falls_back() {
        let mut a = app(1);
        edit(&mut a, FormField::ControlConstant, "0");
        assert_eq!(a.sheet.control_constant, 20.0);
        edit(&mut a, FormField::ControlConstant, "50");
        assert_eq!(a.sheet.control_constant, 50.0);
    }

    #[test]
    fn test_cancel_edit_leaves_sheet() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        select(&mut a, FormField::Creativity(id));
        a.start_editing();
        a.edit_buffer = "9".to_string();
        a.cancel_edit();
        assert_eq!(a.sheet.judges()[0].creativity, 0.0);
        assert!(a.undo_stack.is_empty());
    }

    #[test]
    fn test_enter_on_toggle_flips_it() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        select(&mut a, FormField::HalfWeight(id));
        a.start_editing();
        assert!(a.sheet.judges()[0].half_weight);
        assert_eq!(a.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_calculate_scenario() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        edit(&mut a, FormField::Creativity(id), "8");
        edit(&mut a, FormField::Quality(id), "6");
        edit(&mut a, FormField::Criterion(id, 0), "7");
        a.calculate();

        let breakdown = a.result.as_ref().unwrap().as_ref().unwrap();
        assert!((breakdown.final_score - 7.0).abs() < 1e-9);
        assert!(!a.result_stale);
    }

    #[test]
    fn test_edit_after_calculate_marks_stale() {
        let mut a = app(1);
        a.calculate();
        edit(&mut a, FormField::Voters, "10");
        assert!(a.result_stale);
        a.calculate();
        assert!(!a.result_stale);
    }

    #[test]
    fn test_calculate_with_all_excluded_shows_error() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        select(&mut a, FormField::Excluded(id));
        a.toggle_selected();
        a.calculate();

        assert_eq!(a.result, Some(Err(ScoringError::NoActiveJudges)));
        let (msg, _) = a.flash_message.as_ref().unwrap();
        assert!(msg.starts_with("Error"));
    }

    #[test]
    fn test_add_and_remove_judge() {
        let mut a = app(1);
        a.add_judge();
        assert_eq!(a.sheet.judges().len(), 2);
        let new_id = a.sheet.judges()[1].id;
        assert_eq!(a.selected_field(), Some(FormField::JudgeName(new_id)));

        a.remove_selected_judge();
        assert_eq!(a.sheet.judges().len(), 1);
        assert!(a.table_state.selected().unwrap() < a.fields.len());
    }

    #[test]
    fn test_cannot_remove_last_judge() {
        let mut a = app(1);
        a.remove_selected_judge();
        assert_eq!(a.sheet.judges().len(), 1);
        assert!(a.undo_stack.is_empty());
    }

    #[test]
    fn test_criterion_add_remove() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        a.add_criterion();
        assert_eq!(a.sheet.judges()[0].special_criteria.len(), 2);
        assert_eq!(a.selected_field(), Some(FormField::Criterion(id, 1)));

        a.remove_criterion();
        assert_eq!(a.sheet.judges()[0].special_criteria.len(), 1);
        a.remove_criterion();
        assert_eq!(a.sheet.judges()[0].special_criteria.len(), 1);
    }

    #[test]
    fn test_undo_restores_previous_sheet() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        edit(&mut a, FormField::Creativity(id), "5");
        edit(&mut a, FormField::Creativity(id), "9");
        a.undo_last();
        assert_eq!(a.sheet.judges()[0].creativity, 5.0);
        a.undo_last();
        assert_eq!(a.sheet.judges()[0].creativity, 0.0);
        a.undo_last();
        let (msg, _) = a.flash_message.as_ref().unwrap();
        assert_eq!(msg, "Nothing to undo");
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let mut a = app(1);
        for _ in 0..(MAX_UNDO + 10) {
            a.push_undo();
        }
        assert_eq!(a.undo_stack.len(), MAX_UNDO);
    }

    #[test]
    fn test_field_labels_and_values() {
        let mut a = app(2);
        let second = a.sheet.judges()[1].id;
        edit(&mut a, FormField::Criterion(second, 0), "7.5");
        assert_eq!(a.field_label(FormField::JudgeName(second)), "Judge 2");
        assert_eq!(a.field_value(FormField::Criterion(second, 0)), "7.5");
        assert_eq!(a.field_value(FormField::Excluded(second)), "[ ]");
        assert_eq!(a.field_value(FormField::ControlConstant), "20");
    }

    #[test]
    fn test_rename_judge_ignores_blank() {
        let mut a = app(1);
        let id = a.sheet.judges()[0].id;
        edit(&mut a, FormField::JudgeName(id), "  ");
        assert_eq!(a.sheet.judges()[0].name, "Judge 1");
        edit(&mut a, FormField::JudgeName(id), "Simon");
        assert_eq!(a.sheet.judges()[0].name, "Simon");
    }
}
