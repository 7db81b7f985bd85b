pub mod formatter;
pub mod guide;

pub use formatter::{
    format_breakdown, format_constant, format_formula_trace, format_json, format_number,
    format_summary, format_tsv, judge_annotations, should_use_colors,
};
pub use guide::{formula_guide_lines, FORMULA_GUIDE};
