use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use vokab::language::weight;

use crate::App;

/// How many of the worst words the screen lists at most.
pub const STRUGGLES_LIMIT: usize = 100;

pub struct StruggleRowData<'a> {
    pub prompt: &'a str,
    pub answer: &'a str,
    pub mistakes: u32,
}

/// Pure presenter for a single struggles row
pub fn present_row(data: &StruggleRowData) -> Row<'static> {
    let mistakes_color = if data.mistakes >= 5 {
        Color::Red
    } else if data.mistakes >= 2 {
        Color::Yellow
    } else {
        Color::Green
    };

    Row::new(vec![
        Cell::from(data.prompt.to_string()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(data.answer.to_string()),
        Cell::from(data.mistakes.to_string()).style(Style::default().fg(mistakes_color)),
        Cell::from(weight(data.mistakes).to_string()),
    ])
}

/// Render the struggles screen: words ordered by mistakes
pub fn render_struggles(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Table
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let direction = app.drill.direction();
    let title = Paragraph::new(format!("Words you miss most ({direction})"))
        .block(Block::default().borders(Borders::ALL).title("Struggles"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let struggles = app.drill.struggles(STRUGGLES_LIMIT);
    if struggles.is_empty() {
        let no_data = Paragraph::new("No mistakes recorded yet in this direction.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        // Calculate scrolling bounds
        let table_height = chunks[1].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = struggles.len().saturating_sub(table_height);
        if app.struggles_state.scroll_offset > max_scroll {
            app.struggles_state.scroll_offset = max_scroll;
        }

        let header = Row::new(vec![
            Cell::from("Word"),
            Cell::from("Translation"),
            Cell::from("Mistakes"),
            Cell::from("Weight"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = struggles
            .iter()
            .skip(app.struggles_state.scroll_offset)
            .take(table_height)
            .map(|(pair, mistakes)| {
                present_row(&StruggleRowData {
                    prompt: direction.prompt_of(pair),
                    answer: direction.answer_of(pair),
                    mistakes: *mistakes,
                })
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Mistakes"))
            .column_spacing(2);
        f.render_widget(table, chunks[1]);
    }

    let instructions = Paragraph::new("(↑/↓) scroll  (Home) top  (f2/backspace) back  (esc)ape")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC));
    f.render_widget(instructions, chunks[2]);
}

