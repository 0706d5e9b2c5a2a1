pub mod screen;
pub mod struggles;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use vokab::session::Feedback;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const MIN_FIELD_WIDTH: u16 = 30;

fn border_style(feedback: Feedback) -> Style {
    match feedback {
        Feedback::Neutral => Style::default().fg(Color::Gray),
        Feedback::Correct => Style::default().fg(Color::Green),
        Feedback::Incorrect => Style::default().fg(Color::Red),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let drill = &self.drill;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let red_style = Style::default().fg(Color::Red);

        let Some(prompt) = drill.prompt() else {
            Paragraph::new(Span::styled(
                "No words available. Load a word list with --word-list.",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
            return;
        };

        let content_height = 9;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(area.height.saturating_sub(content_height) / 2),
                    Constraint::Length(1), // direction
                    Constraint::Length(1), // padding
                    Constraint::Length(1), // prompt
                    Constraint::Length(1), // padding
                    Constraint::Length(3), // answer field
                    Constraint::Length(1), // revealed answer
                    Constraint::Length(1), // message
                    Constraint::Min(1),
                    Constraint::Length(1), // legend
                ]
                .as_ref(),
            )
            .split(area);

        let session = &drill.session;
        let header = format!(
            "{}   ·   {}/{} correct",
            drill.direction(),
            session.correct,
            session.answered
        );
        Paragraph::new(Span::styled(header, dim_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(prompt.to_string(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        // center the answer field under the prompt
        let field_width = (prompt.width() as u16)
            .max(drill.input().width() as u16 + 2)
            .max(MIN_FIELD_WIDTH)
            .saturating_add(2)
            .min(chunks[5].width);
        let field_area = Rect {
            x: chunks[5].x + (chunks[5].width - field_width) / 2,
            width: field_width,
            ..chunks[5]
        };
        let cursor = if drill.phase() == vokab::session::Phase::Idle {
            "▏"
        } else {
            ""
        };
        Paragraph::new(Line::from(vec![
            Span::raw(drill.input().to_string()),
            Span::styled(cursor, dim_style),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(drill.feedback())),
        )
        .render(field_area, buf);

        if let Some(answer) = drill.revealed_answer() {
            Paragraph::new(Span::styled(format!("Correct answer: {answer}"), red_style))
                .alignment(Alignment::Center)
                .render(chunks[6], buf);
        }

        if let Some(message) = session.message() {
            let style = border_style(drill.feedback()).add_modifier(Modifier::BOLD);
            Paragraph::new(Span::styled(message, style))
                .alignment(Alignment::Center)
                .render(chunks[7], buf);
        }

        let legend = if drill.is_waiting() {
            "(enter) next word / (tab) direction / (f2) struggles / (esc)ape"
        } else {
            "(enter) check / (tab) direction / (f2) struggles / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[9], buf);
    }
}
