//! Terminal User Interface
//!
//! Card table, countdown and score panel for the quiz, using ratatui

pub mod app;
pub mod toast;
pub mod widgets;

pub use app::App;
pub use toast::ToastQueue;

use crate::data::NoticeKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the game
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub header: Color,
    pub card_colors: [Color; 4],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
            header: Color::Magenta,
            card_colors: [Color::Red, Color::Yellow, Color::Green, Color::Blue],
        }
    }
}

/// Get color for a notice
pub fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Correct => Color::Green,
        NoticeKind::Incorrect => Color::Red,
        NoticeKind::Timeout => Color::Yellow,
    }
}

/// Countdown color: danger in the last 30 seconds, warning in the last minute
pub fn countdown_color(seconds_left: u32, theme: &Theme) -> Color {
    match seconds_left {
        0..=30 => theme.alert,
        31..=60 => theme.warning,
        _ => theme.accent,
    }
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// ASCII art logo
pub const LOGO: &str = r#"
██╗   ██╗███╗   ██╗ ██████╗      ██████╗ ██╗   ██╗██╗███████╗
██║   ██║████╗  ██║██╔═══██╗    ██╔═══██╗██║   ██║██║╚══███╔╝
██║   ██║██╔██╗ ██║██║   ██║    ██║   ██║██║   ██║██║  ███╔╝
██║   ██║██║╚██╗██║██║   ██║    ██║▄▄ ██║██║   ██║██║ ███╔╝
╚██████╔╝██║ ╚████║╚██████╔╝    ╚██████╔╝╚██████╔╝██║███████╗
 ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝      ╚══▀▀═╝  ╚═════╝ ╚═╝╚══════╝
"#;

/// Smaller logo for header
pub const SMALL_LOGO: &str = " UNO QUIZ ";

/// How to play, shown on the start screen
pub const RULES: [&str; 7] = [
    "• Pick one of the 3 cards",
    "• Read the question: you have 6 minutes",
    "• Choose the right answer out of 4",
    "• 10 points: correct on the first try",
    "• 8 points: correct after wrong tries, -1 per wrong try",
    "• 5 points: time ran out",
    "• +10 bonus: answered within 3 minutes",
];

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════╗
║                   CONTROLS                    ║
╠═══════════════════════════════════════════════╣
║  Enter     Start / pick / reveal / confirm    ║
║  ←/→       Move between cards                 ║
║  1-3       Pick a card directly               ║
║  ↑/↓       Move between answers               ║
║  A-D       Answer directly                    ║
║  ?         Toggle this help                   ║
║  Esc       Close help                         ║
║  q         Quit game                          ║
╚═══════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(1),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the game content layout (table + score panel)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),  // Table
            Constraint::Percentage(30),  // Score panel
        ])
        .split(area)
        .to_vec()
}

/// Create the question layout (countdown + prompt + answers)
pub fn create_question_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),       // Countdown
            Constraint::Length(5),       // Prompt
            Constraint::Min(4),          // Answers / hint
        ])
        .split(area)
        .to_vec()
}

/// Rect of the given size centered in `area`, clamped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(360), "6:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn countdown_thresholds() {
        let theme = Theme::default();
        assert_eq!(countdown_color(30, &theme), theme.alert);
        assert_eq!(countdown_color(31, &theme), theme.warning);
        assert_eq!(countdown_color(60, &theme), theme.warning);
        assert_eq!(countdown_color(61, &theme), theme.accent);
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(50, 50, area), area);
    }
}
