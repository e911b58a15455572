use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

pub const HELP_TEXT: &str = "\
/            Edit the device-name filter (Enter or Esc to leave)
1-6          Sort by Detail, Device Name, Location, Temperature, Humidity, Status
             Press again to flip ascending / descending
Space        Select or unselect the device under the cursor
a            Select every matching device, or clear the selection
Enter, e     Expand or collapse the device history
Left, h      Previous page
Right, l     Next page
p            Cycle rows per page
d            Toggle dense rows
Up/Down, k/j Move the cursor
r            Fetch the devices again
?            Show or hide this help
q, Esc       Quit";

/// Centered key reference drawn over the table.
pub struct HelpOverlay {
    border: Color,
}

impl HelpOverlay {
    pub fn new(border: Color) -> Self {
        Self { border }
    }
}

impl Widget for HelpOverlay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = HELP_TEXT.lines().count() as u16 + 2;
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Percentage(80)])
            .flex(Flex::Center)
            .areas(popup);

        Clear.render(popup, buf);
        Paragraph::new(HELP_TEXT)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help (? to close) ")
                    .border_style(Style::default().fg(self.border)),
            )
            .render(popup, buf);
    }
}
