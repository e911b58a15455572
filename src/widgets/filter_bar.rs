use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::filter::FilterMode;

/// The device-name filter box. Shows the compile error in the title when
/// the pattern is invalid.
pub struct FilterBar<'a> {
    text: &'a str,
    mode: FilterMode,
    active: bool,
    notice: Option<String>,
    border: Color,
    error: Color,
}

impl<'a> FilterBar<'a> {
    pub fn new(text: &'a str, mode: FilterMode) -> Self {
        Self {
            text,
            mode,
            active: false,
            notice: None,
            border: Color::Cyan,
            error: Color::Red,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_colors(mut self, border: Color, error: Color) -> Self {
        self.border = border;
        self.error = error;
        self
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match &self.notice {
            Some(notice) => format!(" {} ", notice),
            None => format!(" Filter devices ({}) ", self.mode.as_str()),
        };
        let border_color = if self.notice.is_some() {
            self.error
        } else if self.active {
            self.border
        } else {
            Color::DarkGray
        };

        let mut spans = vec![Span::raw(self.text.to_string())];
        if self.active {
            spans.push(Span::styled(
                " ",
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else if self.text.is_empty() {
            spans.push(Span::styled(
                "press / to filter by device name",
                Style::default().fg(Color::DarkGray),
            ));
        }

        Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(border_color)),
            )
            .render(area, buf);
    }
}
