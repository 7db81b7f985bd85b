use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{
    BiasFlag, JudgeScore, ScoreBreakdown, AUDIENCE_WEIGHT, JUDGES_WEIGHT, M_PER_JUDGE,
};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a value the way every score is displayed: two decimals.
pub fn format_number(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a constant without a trailing ".00" when it is a whole number.
pub fn format_constant(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format_number(value)
    }
}

/// Annotations shown next to a judge's average.
pub fn judge_annotations(score: &JudgeScore) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if score.half_weight {
        notes.push("half weight");
    }
    if score.excluded {
        notes.push("excluded");
    }
    notes
}

fn color_flag(text: &str, flag: BiasFlag) -> String {
    match flag {
        BiasFlag::Green => text.green().to_string(),
        BiasFlag::Yellow => text.yellow().to_string(),
        BiasFlag::Red => text.red().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a judge name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format one judge's line of the breakdown.
/// Format: "{name}: special {s}, average {a} [notes] {emoji} z={z}"
fn format_judge_line(score: &JudgeScore, name_width: usize, use_colors: bool) -> String {
    let name = truncate_name(&score.name, name_width);
    let notes = judge_annotations(score);
    let notes_str = if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join(", "))
    };
    let bias = format!(
        "{} z={:+.2} {}",
        score.bias.flag.emoji(),
        score.bias.z_score,
        score.bias.flag.label()
    );

    if use_colors {
        format!(
            "  {:<width$}  special {}  average {}{}  {}",
            name.bold(),
            format_number(score.special_criteria_average),
            format_number(score.average).cyan(),
            notes_str.dimmed(),
            color_flag(&bias, score.bias.flag),
            width = name_width
        )
    } else {
        format!(
            "  {:<width$}  special {}  average {}{}  {}",
            name,
            format_number(score.special_criteria_average),
            format_number(score.average),
            notes_str,
            bias,
            width = name_width
        )
    }
}

/// The formula trace: every intermediate value on its own line.
pub fn format_formula_trace(breakdown: &ScoreBreakdown) -> Vec<String> {
    vec![
        format!(
            "Judges Avg = {} ({} active)",
            format_number(breakdown.judges_average),
            breakdown.active_judges
        ),
        format!("Audience Avg = {}", format_number(breakdown.audience_average)),
        format!(
            "M = max({} × {}, {}) = {}",
            breakdown.active_judges,
            format_constant(M_PER_JUDGE),
            format_constant(breakdown.control_floor),
            format_constant(breakdown.control_constant)
        ),
        format!(
            "Audience Effective = {}",
            format_number(breakdown.audience_effective)
        ),
        format!(
            "Final = ({} × {}) + ({} × {}) = {}",
            format_number(breakdown.judges_average),
            JUDGES_WEIGHT,
            format_number(breakdown.audience_effective),
            AUDIENCE_WEIGHT,
            format_number(breakdown.final_score)
        ),
    ]
}

/// Format the full calculation breakdown for terminal output
pub fn format_breakdown(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    let longest_name = breakdown
        .judges
        .iter()
        .map(|j| j.name.chars().count())
        .max()
        .unwrap_or(0);
    // Leave room for the numeric columns on narrow terminals
    let name_width = match get_terminal_width() {
        Some(width) if width > 70 => longest_name.min(width - 60),
        Some(_) => longest_name.min(12),
        None => longest_name,
    };

    let mut lines = Vec::new();
    lines.push(format_summary(breakdown, use_colors));
    lines.push(String::new());

    let heading = "Judge Averages:";
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading.to_string()
    });
    for score in &breakdown.judges {
        lines.push(format_judge_line(score, name_width, use_colors));
    }

    lines.push(String::new());
    let heading = "Formula Results:";
    lines.push(if use_colors {
        heading.bold().to_string()
    } else {
        heading.to_string()
    });
    let trace = format_formula_trace(breakdown);
    let last = trace.len() - 1;
    for (i, line) in trace.into_iter().enumerate() {
        if use_colors && i == last {
            lines.push(format!("  {}", line.yellow().bold()));
        } else {
            lines.push(format!("  {}", line));
        }
    }

    lines.join("\n")
}

/// Single-line summary of the headline numbers
pub fn format_summary(breakdown: &ScoreBreakdown, use_colors: bool) -> String {
    if use_colors {
        format!(
            "Final Score: {}  (judges {}, audience {}, audience effective {})",
            format_number(breakdown.final_score).bold().yellow(),
            format_number(breakdown.judges_average),
            format_number(breakdown.audience_average),
            format_number(breakdown.audience_effective)
        )
    } else {
        format!(
            "Final Score: {}  (judges {}, audience {}, audience effective {})",
            format_number(breakdown.final_score),
            format_number(breakdown.judges_average),
            format_number(breakdown.audience_average),
            format_number(breakdown.audience_effective)
        )
    }
}

/// Format judges as tab-separated values for scripting
/// Columns: name, special average, average, z-score, flag, excluded (no headers, no colors)
/// The last line carries the final score.
pub fn format_tsv(breakdown: &ScoreBreakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .judges
        .iter()
        .map(|score| {
            format!(
                "{}\t{}\t{}\t{:.2}\t{}\t{}",
                score.name,
                format_number(score.special_criteria_average),
                format_number(score.average),
                score.bias.z_score,
                score.bias.flag.label(),
                score.excluded
            )
        })
        .collect();
    lines.push(format!("final\t{}", format_number(breakdown.final_score)));
    lines.join("\n")
}

/// Pretty JSON of the whole breakdown
pub fn format_json(breakdown: &ScoreBreakdown) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(breakdown)?)
}
