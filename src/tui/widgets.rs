//! Custom widgets for the game UI

use crate::data::NoticeKind;
use crate::tui::format_clock;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// A draining bar with the remaining time as `m:ss`
pub struct CountdownBar {
    remaining: u32,
    total: u32,
    color: Color,
}

impl CountdownBar {
    pub fn new(remaining: u32, total: u32) -> Self {
        Self {
            remaining,
            total: total.max(1),
            color: Color::Cyan,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for CountdownBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let label = format!("{} left", format_clock(self.remaining));
        buf.set_string(
            area.x,
            area.y,
            &label,
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        );

        if area.height > 1 {
            let inner = u32::from(area.width - 2);
            let filled = (self.remaining.min(self.total) * inner / self.total) as u16;
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(self.color));
            }
            for x in filled..(area.width - 2) {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

/// A face-down card drawn with a double-line border
pub struct CardBack {
    number: usize,
    color: Color,
    highlighted: bool,
}

impl CardBack {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            color: Color::Red,
            highlighted: false,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }
}

impl Widget for CardBack {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height < 3 {
            return;
        }

        let mut style = Style::default().fg(self.color);
        if self.highlighted {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        let right = area.x + area.width - 1;
        let bottom = area.y + area.height - 1;

        // Borders
        buf.set_string(area.x, area.y, "╔", style);
        buf.set_string(right, area.y, "╗", style);
        buf.set_string(area.x, bottom, "╚", style);
        buf.set_string(right, bottom, "╝", style);
        for x in area.x + 1..right {
            buf.set_string(x, area.y, "═", style);
            buf.set_string(x, bottom, "═", style);
        }
        for y in area.y + 1..bottom {
            buf.set_string(area.x, y, "║", style);
            buf.set_string(right, y, "║", style);
            for x in area.x + 1..right {
                buf.set_string(x, y, "░", Style::default().fg(self.color));
            }
        }

        // Centered label
        let label = format!(" UNO {} ", self.number);
        let label_width = label.chars().count() as u16;
        if label_width + 2 <= area.width {
            let x = area.x + (area.width - label_width) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, &label, style.add_modifier(Modifier::BOLD));
        }
    }
}

/// One line of player feedback
pub struct NoticeLine {
    kind: NoticeKind,
    message: String,
}

impl NoticeLine {
    pub fn new(kind: NoticeKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

impl Widget for NoticeLine {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = crate::tui::notice_color(self.kind);
        let text = format!("{} {} {}", self.kind.symbol(), self.kind.title(), self.message);
        buf.set_stringn(
            area.x,
            area.y,
            &text,
            area.width as usize,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn countdown_bar_fills_proportionally() {
        let area = Rect::new(0, 0, 12, 2);
        let mut buf = Buffer::empty(area);
        CountdownBar::new(180, 360).render(area, &mut buf);

        assert!(row(&buf, 0).starts_with("3:00 left"));
        assert_eq!(row(&buf, 1), "[█████░░░░░]");
    }

    #[test]
    fn card_back_shows_number() {
        let area = Rect::new(0, 0, 12, 5);
        let mut buf = Buffer::empty(area);
        CardBack::new(2).render(area, &mut buf);

        assert!(row(&buf, 0).starts_with('╔'));
        assert!(row(&buf, 2).contains("UNO 2"));
    }

    #[test]
    fn notice_line_is_truncated_to_area() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        NoticeLine::new(NoticeKind::Correct, "+20 points").render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("✔ Correc"));
    }
}
