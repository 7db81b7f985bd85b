use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap};
use crate::output::{format_formula_trace, format_number, formula_guide_lines, judge_annotations};
use crate::scoring::ScoreBreakdown;
use crate::tui::app::{App, FormField, InputMode};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 50 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Fill(1),    // Form and results
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    let body = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ])
    .split(chunks[1]);

    render_title(frame, chunks[0], app);
    render_form(frame, body[0], app);
    render_results(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Formulas => render_formulas_popup(frame, app),
        InputMode::Normal | InputMode::Editing => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "Talent Score";
    let mut spans = vec![Span::styled(left, Style::default().fg(app.theme.title_color).bold())];

    let counts = format!(
        "{} judges, {} active",
        app.sheet.judges().len(),
        app.sheet.active_count()
    );
    let padding_len = (area.width as usize).saturating_sub(left.len() + counts.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(counts, Style::default().fg(app.theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &mut App) {
    let editing_row = match app.input_mode {
        InputMode::Editing => app.table_state.selected(),
        _ => None,
    };

    let rows: Vec<Row> = app
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let label = app.field_label(*field);
            let excluded = field
                .judge_id()
                .and_then(|id| app.sheet.judge(id))
                .map(|j| j.excluded)
                .unwrap_or(false);

            let label_style = match field {
                FormField::JudgeName(_) | FormField::Voters => app.theme.judge_header,
                _ if excluded => Style::default().fg(app.theme.excluded_color),
                _ => Style::default().fg(app.theme.label_color),
            };

            let value_cell = if editing_row == Some(idx) {
                Cell::from(format!("{}|", app.edit_buffer)).style(app.theme.editing_style)
            } else {
                let style = if excluded {
                    Style::default().fg(app.theme.excluded_color)
                } else {
                    Style::default().fg(app.theme.value_color)
                };
                Cell::from(app.field_value(*field)).style(style)
            };

            Row::new(vec![Cell::from(label).style(label_style), value_cell])
        })
        .collect();

    let widths = [
        Constraint::Length(24),  // Label
        Constraint::Fill(1),     // Value
    ];

    let table = Table::new(rows, widths)
        .block(Block::bordered().title(" Score Sheet "))
        .row_highlight_style(app.theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let mut title = " Results ".to_string();
    if app.result_stale {
        title = " Results (stale, press c) ".to_string();
    }
    let title_style = if app.result_stale {
        Style::default().fg(app.theme.stale_color)
    } else {
        Style::default()
    };
    let block = Block::bordered().title(Span::styled(title, title_style));

    let lines = match &app.result {
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Enter the scores, then press c to calculate.",
                Style::default().fg(app.theme.muted),
            )),
        ],
        Some(Err(e)) => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Cannot calculate: {}", e),
                Style::default().fg(app.theme.flash_error).bold(),
            )),
        ],
        Some(Ok(breakdown)) => breakdown_lines(breakdown, app),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn breakdown_lines(breakdown: &ScoreBreakdown, app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Final Score  "),
            Span::styled(format_number(breakdown.final_score), theme.final_score),
        ]),
        Line::from(vec![
            Span::styled("Judges Average      ", Style::default().fg(theme.muted)),
            Span::raw(format_number(breakdown.judges_average)),
        ]),
        Line::from(vec![
            Span::styled("Audience Average    ", Style::default().fg(theme.muted)),
            Span::raw(format_number(breakdown.audience_average)),
        ]),
        Line::from(vec![
            Span::styled("Audience Effective  ", Style::default().fg(theme.muted)),
            Span::raw(format_number(breakdown.audience_effective)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Judge Averages", theme.section_title)),
    ];

    for score in &breakdown.judges {
        let notes = judge_annotations(score);
        let notes_str = if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        };
        let name_style = if score.excluded {
            Style::default().fg(theme.excluded_color)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", score.name), name_style),
            Span::raw(format!(
                "special {}  avg {}",
                format_number(score.special_criteria_average),
                format_number(score.average)
            )),
            Span::styled(notes_str, Style::default().fg(theme.muted)),
            Span::raw("  "),
            Span::styled(
                format!("{} z={:+.2}", score.bias.flag.emoji(), score.bias.z_score),
                Style::default().fg(theme.flag_color(score.bias.flag)),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Formula Results", theme.section_title)));
    let trace = format_formula_trace(breakdown);
    let last = trace.len().saturating_sub(1);
    for (i, line) in trace.into_iter().enumerate() {
        if i == last {
            lines.push(Line::from(Span::styled(line, theme.final_score)));
        } else {
            lines.push(Line::from(line));
        }
    }

    lines
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Error") || msg.starts_with("Failed") {
            app.theme.flash_error
        } else if msg.starts_with("Calculated") || msg.starts_with("Added")
            || msg.starts_with("Removed") || msg.starts_with("Undid") {
            app.theme.flash_success
        } else {
            Color::White  // Default for unknown message types
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: Vec<(&str, &str)> = match app.input_mode {
            InputMode::Editing => vec![
                ("Enter", ":confirm "),
                ("Esc", ":cancel"),
            ],
            _ => vec![
                ("j/k", ":nav "),
                ("Enter", ":edit "),
                ("Space", ":toggle "),
                ("a/d", ":judge "),
                ("+/-", ":criteria "),
                ("c", ":calculate "),
                ("u", ":undo "),
                ("f", ":formulas "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(app.theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.theme.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(52, 18, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border))
        .style(Style::default().bg(app.theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next field"),
        ("k / Up        ", "Previous field"),
        ("Enter / e     ", "Edit field (toggles checkboxes)"),
        ("Space         ", "Toggle half weight / excluded"),
        ("a             ", "Add judge"),
        ("d             ", "Remove selected judge"),
        ("+             ", "Add special criterion"),
        ("-             ", "Remove last special criterion"),
        ("c             ", "Calculate result"),
        ("u             ", "Undo last change"),
        ("f             ", "Show formulas"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(
        Span::styled("Press any key to close", Style::default().fg(app.theme.muted))
    ));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the static formula guide
fn render_formulas_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(70, 44, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Formulas ", app.theme.popup_title))
        .border_style(Style::default().fg(app.theme.popup_border))
        .style(Style::default().bg(app.theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);
    let lines: Vec<Line> = formula_guide_lines().map(Line::from).collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
