use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

const NORMAL_CONTROLS: [(&str, &str); 10] = [
    ("/", "Filter"),
    ("1-6", "Sort"),
    ("Spc", "Select"),
    ("a", "All"),
    ("⏎", "Expand"),
    ("←→", "Page"),
    ("p", "Size"),
    ("d", "Dense"),
    ("r", "Refresh"),
    ("?", "Help"),
];

const FILTER_CONTROLS: [(&str, &str); 3] = [("⏎", "Done"), ("Esc", "Done"), ("^U", "Clear")];

/// Key hints along the bottom of the screen.
#[derive(Default)]
pub struct Controls {
    pub row_count: Option<usize>,
    pub dimmed: bool,
    pub filtering: bool,
    pub bg: Option<Color>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_filtering(mut self, filtering: bool) -> Self {
        self.filtering = filtering;
        self
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    fn pairs(&self) -> &'static [(&'static str, &'static str)] {
        if self.filtering {
            &FILTER_CONTROLS
        } else {
            &NORMAL_CONTROLS
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pairs = self.pairs();
        let mut constraints = pairs.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15)); // "Devices: 12345"
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let color = self.bg.unwrap_or(Color::DarkGray);

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in pairs.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(color))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = pairs.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Devices: {}", count))
                .style(base_style.bg(color).fg(if self.dimmed {
                    Color::DarkGray
                } else {
                    Color::White
                }))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(color))
            .render(layout[fill_start_idx], buf);
    }
}
