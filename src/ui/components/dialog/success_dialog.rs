//! Success dialog shown once a request has been delivered

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

pub fn render_success_dialog(frame: &mut Frame, title: &str, message: &str) {
    let hint = vec![
        Span::styled(
            "Enter",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" 확인"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title,
            title_color: Color::Green,
            border_color: Color::Green,
            message,
            hint: Some(hint),
            ..Default::default()
        },
    );
}
