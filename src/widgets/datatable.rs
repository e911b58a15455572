use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Padding, Paragraph, Row, StatefulWidget, Table, TableState, Widget,
    },
};

use crate::config::Theme;
use crate::pagination::{filler_lines, row_lines};
use crate::record::{Details, Record};
use crate::sort::SortField;
use crate::view::{TableView, VisibleRow};

/// Width of the time column in the sample listings.
const TIME_WIDTH: usize = 10;

/// Cursor over the visible rows of the current page.
#[derive(Default)]
pub struct DeviceTableState {
    pub table_state: TableState,
    cursor: usize,
}

impl DeviceTableState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor on a row that exists.
    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// The telemetry table for one page: checkbox, expand toggle, the sortable
/// columns, the chart name and, for expanded rows, every history sample.
pub struct DeviceTable<'a> {
    view: &'a TableView,
    theme: &'a Theme,
    loading: bool,
}

impl<'a> DeviceTable<'a> {
    pub fn new(view: &'a TableView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            loading: false,
        }
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn header(&self) -> Row<'a> {
        let mut cells = vec![Cell::from(self.view.header_check().symbol())];
        for field in SortField::ALL {
            let label = if field == self.view.sort.order_by {
                format!("{} {}", field.label(), self.view.sort.order.indicator())
            } else {
                field.label().to_string()
            };
            let style = if field == self.view.sort.order_by {
                Style::default()
                    .fg(self.theme.get("primary"))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            cells.push(Cell::from(label).style(style));
        }
        cells.push(Cell::from("Chart"));
        Row::new(cells).style(
            Style::default()
                .fg(self.theme.get("table_header"))
                .add_modifier(Modifier::BOLD),
        )
    }

    fn device_row(&self, row: &VisibleRow) -> Row<'a> {
        let record = &row.record;
        let checkbox = if row.selected { "[x]" } else { "[ ]" };
        let arrow = if row.expanded { "▾" } else { "▸" };
        let status_color = if record.status.is_healthy() {
            self.theme.get("healthy")
        } else {
            self.theme.get("unhealthy")
        };

        let cells = vec![
            Cell::from(checkbox),
            Cell::from(format!("{} {}", arrow, record.id)),
            Cell::from(record.name.clone()),
            Cell::from(record.location.clone()),
            Cell::from(format_temperature(record.current_temperature)),
            Cell::from(format_humidity(record.current_humidity)),
            Cell::from(Span::styled(
                record.status.as_str(),
                Style::default().fg(status_color),
            )),
            Cell::from(record.details.name.clone()),
        ];

        let style = if row.selected {
            Style::default().bg(self.theme.get("row_selected"))
        } else {
            Style::default()
        };
        Row::new(cells)
            .height(row_lines(self.view.dense))
            .style(style)
    }

    /// Temperature samples under the name column, humidity samples under
    /// the location column.
    fn detail_row(&self, record: &Record) -> Row<'a> {
        let dim = Style::default().fg(self.theme.get("detail_border"));
        let header = Style::default()
            .fg(self.theme.get("table_header"))
            .add_modifier(Modifier::BOLD);
        let listing = |lines: Vec<String>| {
            let mut lines = lines.into_iter();
            let mut text: Vec<Line> = Vec::new();
            if let Some(first) = lines.next() {
                text.push(Line::styled(first, header));
            }
            text.extend(lines.map(Line::from));
            Cell::from(text)
        };
        Row::new(vec![
            Cell::from(""),
            Cell::from(Line::styled("  └", dim)),
            listing(temperature_lines(&record.details)),
            listing(humidity_lines(&record.details)),
        ])
        .height(detail_height(&record.details))
    }
}

fn format_temperature(value: f64) -> String {
    format!("{:.1} °C", value)
}

fn format_humidity(value: f64) -> String {
    format!("{:.1} %", value)
}

fn sample_lines(
    label: &str,
    samples: impl ExactSizeIterator<Item = (f64, String)>,
) -> Vec<String> {
    let count = samples.len();
    let mut lines = Vec::with_capacity(count + 1);
    lines.push(format!("{:<width$}{}", "Time", label, width = TIME_WIDTH));
    if count == 0 {
        lines.push("no samples".to_string());
    }
    lines.extend(
        samples.map(|(time, value)| format!("{:<width$}{}", time, value, width = TIME_WIDTH)),
    );
    lines
}

/// Header plus one `time value` line per temperature sample.
pub fn temperature_lines(details: &Details) -> Vec<String> {
    sample_lines(
        "Temperature",
        details
            .temperature_data_points
            .iter()
            .map(|p| (p.time, format!("{}C", p.temp))),
    )
}

/// Header plus one `time value` line per humidity sample.
pub fn humidity_lines(details: &Details) -> Vec<String> {
    sample_lines(
        "Humidity",
        details
            .humidity_data_points
            .iter()
            .map(|p| (p.time, p.humi.to_string())),
    )
}

/// Lines needed to list the longer of the two series.
pub fn detail_height(details: &Details) -> u16 {
    let samples = details
        .temperature_data_points
        .len()
        .max(details.humidity_data_points.len())
        .max(1);
    u16::try_from(samples)
        .unwrap_or(u16::MAX)
        .saturating_add(1)
}

impl StatefulWidget for DeviceTable<'_> {
    type State = DeviceTableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("table_border")));

        if self.view.rows.is_empty() {
            let message = if self.loading {
                "Loading devices..."
            } else if self.view.total_filtered == 0 {
                "No devices match"
            } else {
                "Nothing on this page"
            };
            Paragraph::new(message)
                .centered()
                .style(Style::default().fg(self.theme.get("dimmed")))
                .block(border.padding(Padding::top(area.height.saturating_sub(2) / 2)))
                .render(area, buf);
            return;
        }

        state.clamp(self.view.rows.len());

        // table index of the cursor row, shifted by detail rows above it
        let mut rows = Vec::with_capacity(self.view.rows.len() * 2 + 1);
        let mut selected_index = 0;
        for (i, row) in self.view.rows.iter().enumerate() {
            if i == state.cursor {
                selected_index = rows.len();
            }
            rows.push(self.device_row(row));
            if row.expanded {
                rows.push(self.detail_row(&row.record));
            }
        }
        if self.view.empty_rows > 0 {
            let filler = filler_lines(self.view.dense, self.view.empty_rows);
            rows.push(Row::new(Vec::<Cell>::new()).height(filler));
        }
        state.table_state.select(Some(selected_index));

        let widths = [
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(16),
            Constraint::Length(13),
            Constraint::Length(14),
            Constraint::Fill(1),
        ];

        let highlight = if self.theme.get_optional("table_selected") == Some(Color::Reset) {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().bg(self.theme.get("table_selected"))
        };

        StatefulWidget::render(
            Table::new(rows, widths)
                .column_spacing(1)
                .header(self.header())
                .block(border)
                .row_highlight_style(highlight),
            area,
            buf,
            &mut state.table_state,
        );
    }
}
