//! Request form rendering (free analysis, paid analysis, partner request)

use super::field_renderer::draw_field;
use crate::app::App;
use crate::state::{AttachmentSlot, FormInstance, FormKind, FormRow, LabelResolver};
use crate::ui::components::{render_submit_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FIELD_HEIGHT: u16 = 3;
const MULTILINE_FIELD_HEIGHT: u16 = 6;
const ATTACHMENT_HEIGHT: u16 = 4;
const SIDE_PANEL_WIDTH: u16 = 40;

/// Draw the mounted request form with its attachment panel
pub fn draw_request_form(frame: &mut Frame, area: Rect, app: &App) {
    let Some(form) = app.state.form.as_ref() else {
        return;
    };

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),                   // Fields
            Constraint::Length(SIDE_PANEL_WIDTH), // Attachments and submit
        ])
        .split(area);

    draw_fields(frame, main_chunks[0], form, app.labels());
    draw_side_panel(frame, main_chunks[1], form);
}

fn field_height(is_multiline: bool) -> u16 {
    if is_multiline {
        MULTILINE_FIELD_HEIGHT
    } else {
        FIELD_HEIGHT
    }
}

/// First row to draw so that `active` fits in `available` rows
fn first_visible(heights: &[u16], active: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let active = active.min(heights.len() - 1);
    let mut start = 0;
    while start < active && heights[start..=active].iter().sum::<u16>() > available {
        start += 1;
    }
    start
}

fn draw_fields(frame: &mut Frame, area: Rect, form: &FormInstance, labels: &LabelResolver) {
    let active_row = form.active_row();
    let fields_focused = matches!(active_row, FormRow::Field(_));

    let mut title = vec![Span::styled(
        format!(" {} ", form.kind.title()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if form.kind == FormKind::PaidAnalysis {
        title.push(Span::styled(
            "[결제 완료] ",
            Style::default().fg(Color::Green),
        ));
    }

    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if fields_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = form.answers.fields();
    let heights: Vec<u16> = fields.iter().map(|f| field_height(f.is_multiline)).collect();
    let start = first_visible(&heights, form.active_field_index, inner.height);

    let mut y = inner.y;
    for (idx, field) in fields.iter().enumerate().skip(start) {
        let height = heights[idx];
        if y + height > inner.y + inner.height {
            break;
        }
        let field_area = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height,
        };
        draw_field(
            frame,
            field_area,
            field,
            labels,
            active_row == FormRow::Field(idx),
        );
        y += height;
    }
}

fn draw_side_panel(frame: &mut Frame, area: Rect, form: &FormInstance) {
    let active_row = form.active_row();
    let panel_focused = !matches!(active_row, FormRow::Field(_));

    let block = Block::default()
        .title(" 파일 첨부 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if panel_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ATTACHMENT_HEIGHT), // Quote
            Constraint::Length(ATTACHMENT_HEIGHT), // Blueprint
            Constraint::Length(3),                 // Accepted formats
            Constraint::Length(BUTTON_HEIGHT),     // Submit
            Constraint::Min(0),
        ])
        .split(inner);

    for (slot, slot_area) in AttachmentSlot::ALL.into_iter().zip([chunks[0], chunks[1]]) {
        draw_attachment(
            frame,
            slot_area,
            form,
            slot,
            active_row == FormRow::Attachment(slot),
        );
    }

    let formats = AttachmentSlot::ALL
        .iter()
        .map(|slot| {
            let extensions = form.kind.accepted_extensions(*slot).join(", ");
            Line::from(Span::styled(
                format!("{}: {extensions}", slot.label()),
                Style::default().fg(Color::DarkGray),
            ))
        })
        .collect::<Vec<_>>();
    frame.render_widget(Paragraph::new(formats).wrap(Wrap { trim: true }), chunks[2]);

    render_submit_button(
        frame,
        chunks[3],
        form.kind.submit_label(),
        active_row == FormRow::Submit,
        form.is_submitting(),
    );
}

fn draw_attachment(
    frame: &mut Frame,
    area: Rect,
    form: &FormInstance,
    slot: AttachmentSlot,
    is_active: bool,
) {
    let status = match form.attachments.get(slot) {
        Some(attachment) => Line::from(Span::styled(
            format!("✓ {}", attachment.summary()),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(
            "첨부되지 않음",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let input = &form.attachment_inputs[slot.index()];
    let path_line = if input.is_empty() && !is_active {
        Line::from(Span::styled(
            "경로 입력 후 Enter",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut spans = vec![Span::raw(input.as_str())];
        if is_active {
            spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };

    let block = Block::default()
        .title(format!(" {} (선택) ", slot.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if is_active {
            Color::Cyan
        } else {
            Color::DarkGray
        }));

    frame.render_widget(Paragraph::new(vec![status, path_line]).block(block), area);
}
