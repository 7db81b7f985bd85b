//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::scoring::BiasFlag;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Bias flags (traffic light pattern)
    pub flag_green: Color,
    pub flag_yellow: Color,
    pub flag_red: Color,

    // Form table
    pub judge_header: Style,
    pub label_color: Color,
    pub value_color: Color,
    pub row_selected: Style,
    pub editing_style: Style,

    // Results pane
    pub final_score: Style,
    pub section_title: Style,
    pub stale_color: Color,
    pub excluded_color: Color,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            flag_green: Color::Green,
            flag_yellow: Color::Yellow,
            flag_red: Color::Red,
            judge_header: Style::new().fg(Color::Yellow).bold(),
            label_color: Color::Gray,
            value_color: Color::White,
            row_selected: Style::new().reversed(),
            editing_style: Style::new().fg(Color::Black).bg(Color::Yellow),
            final_score: Style::new().fg(Color::Yellow).bold(),
            section_title: Style::new().fg(Color::Cyan).bold(),
            stale_color: Color::Magenta,
            excluded_color: Color::DarkGray,
            muted: Color::Gray,
            title_color: Color::Cyan,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    /// Color for a judge's bias flag
    pub fn flag_color(&self, flag: BiasFlag) -> Color {
        match flag {
            BiasFlag::Green => self.flag_green,
            BiasFlag::Yellow => self.flag_yellow,
            BiasFlag::Red => self.flag_red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_colors() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.flag_color(BiasFlag::Green), Color::Green);
        assert_eq!(theme.flag_color(BiasFlag::Yellow), Color::Yellow);
        assert_eq!(theme.flag_color(BiasFlag::Red), Color::Red);
    }
}
