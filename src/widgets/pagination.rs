use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::view::TableView;

/// Footer under the table: rows per page, displayed range and page arrows.
pub struct PaginationBar<'a> {
    view: &'a TableView,
    options: &'a [usize],
    accent: Color,
}

impl<'a> PaginationBar<'a> {
    pub fn new(view: &'a TableView, options: &'a [usize]) -> Self {
        Self {
            view,
            options,
            accent: Color::Cyan,
        }
    }

    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = accent;
        self
    }

    pub fn text(&self) -> String {
        let pages = self.view.page_count().max(1);
        let prev = if self.view.page > 0 { "‹" } else { " " };
        let next = if self.view.page + 1 < self.view.page_count() {
            "›"
        } else {
            " "
        };
        let sizes = self
            .options
            .iter()
            .map(|s| {
                if *s == self.view.page_size {
                    format!("[{}]", s)
                } else {
                    s.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Rows per page: {}   {}   {} page {}/{} {}{}",
            sizes,
            self.view.displayed_rows_label(),
            prev,
            self.view.page + 1,
            pages,
            next,
            if self.view.dense { "   dense" } else { "" }
        )
    }
}

impl Widget for &PaginationBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            self.text(),
            Style::default().fg(self.accent),
        )))
        .right_aligned()
        .render(area, buf);
    }
}
