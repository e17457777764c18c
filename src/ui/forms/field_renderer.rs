//! Field rendering utilities for forms

use crate::state::{FormField, LabelResolver};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw a form field from the domain layer. Select fields show the label
/// of the chosen code between arrows.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: &FormField,
    labels: &LabelResolver,
    is_active: bool,
) {
    if field.is_choice() {
        let value = field.display_value(labels);
        let content = if value.is_empty() {
            Line::from(Span::styled(
                field.placeholder,
                Style::default().fg(Color::DarkGray),
            ))
        } else if is_active {
            Line::from(vec![
                Span::styled("◀ ", Style::default().fg(Color::Cyan)),
                Span::raw(value),
                Span::styled(" ▶", Style::default().fg(Color::Cyan)),
            ])
        } else {
            Line::from(value)
        };
        let block = Block::default()
            .title(format!(" {} ", field.label))
            .borders(Borders::ALL)
            .border_style(border_style(is_active));
        frame.render_widget(Paragraph::new(content).block(block), area);
        return;
    }

    draw_field_with_value(
        frame,
        area,
        &field.label,
        field.as_text(),
        field.placeholder,
        is_active,
        field.is_multiline,
    );
}

/// Draw a text field with a raw value and placeholder
pub fn draw_field_with_value(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    is_active: bool,
    is_multiline: bool,
) {
    let cursor = Span::styled(
        if is_active { "▌" } else { "" },
        Style::default().fg(Color::Cyan),
    );

    let content = if value.is_empty() {
        Paragraph::new(Line::from(vec![
            cursor,
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ]))
    } else if is_multiline {
        let mut lines: Vec<Line> = value.split('\n').map(Line::from).collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans.push(cursor);
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![Span::raw(value), cursor]))
    };

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
