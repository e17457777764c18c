//! Payment screen of the paid analysis tier

use crate::app::App;
use crate::state::{PAID_ANALYSIS_FEATURES, PAID_ANALYSIS_PRICE, PAYMENT_ACCOUNT};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use std::time::Instant;

/// Draw the payment summary and the transfer confirmation button
pub fn draw_payment(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let payment = &app.state.navigator.payment;

    let block = Block::default()
        .title(" 유료 견적 분석 결제 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Intro
            Constraint::Length(5), // Price
            Constraint::Length(PAID_ANALYSIS_FEATURES.len() as u16 + 2), // Features
            Constraint::Length(2),             // Account
            Constraint::Length(BUTTON_HEIGHT), // Confirm
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    frame.render_widget(
        Paragraph::new("전문가의 상세 분석 서비스를 이용하시려면 결제를 진행해 주세요")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        chunks[0],
    );

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let price = Paragraph::new(vec![
        Line::from(vec![Span::raw("책임 견적 분석 서비스  "), Span::raw(PAID_ANALYSIS_PRICE)]),
        Line::from("부가세  0원"),
        Line::from(Span::styled(format!("총 결제금액  {PAID_ANALYSIS_PRICE}"), bold)),
    ])
    .block(Block::default().title(" 서비스 상세 ").borders(Borders::ALL));
    frame.render_widget(price, chunks[1]);

    let features: Vec<Line> = PAID_ANALYSIS_FEATURES
        .iter()
        .map(|feature| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::raw(*feature),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(features)
            .block(Block::default().title(" 포함 서비스 ").borders(Borders::ALL)),
        chunks[2],
    );

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled("무통장 안전결제", Style::default().fg(Color::Green))),
            Line::from(PAYMENT_ACCOUNT),
        ]),
        chunks[3],
    );

    if payment.is_confirming() {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Yellow))
            .label("입금 확인 중...")
            .ratio(f64::from(payment.progress(now)).clamp(0.0, 1.0));
        frame.render_widget(gauge, chunks[4]);
    } else {
        render_button(frame, chunks[4], "입금 완료", true, true, Color::Yellow);
    }
}
