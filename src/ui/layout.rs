//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header and main content, keeping the bottom
/// line for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the header with the brand and a breadcrumb of the current view
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.state.current_view();

    let mut trail = vec![view];
    let mut cursor = view;
    while cursor != View::Landing {
        cursor = cursor.parent();
        trail.push(cursor);
    }
    trail.reverse();

    let mut spans = vec![Span::styled(
        " THE SEEKER ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for step in trail.iter().skip(1) {
        spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
        let style = if *step == view {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(step.title(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Relay credential status
    let relay_status = if app.is_configured() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(relay_status);

    // View-specific hints
    let hints = get_view_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(app: &App) -> String {
    match app.state.current_view() {
        View::Landing => "←/→:select  Enter:open  1/2:jump  q:quit".to_string(),
        View::AnalysisSelection => "←/→:select  Enter:open  Esc:back  Home:home".to_string(),
        View::PaidAnalysis if !app.state.navigator.payment.is_form_entry() => {
            "Enter:입금 완료  Esc:back  Home:home".to_string()
        }
        View::FreeAnalysis | View::PaidAnalysis | View::PartnerRequest => format!(
            "Tab:next  ←/→:choose  {SUBMIT_SHORTCUT}:submit  Del:remove file  Esc:back"
        ),
    }
}
