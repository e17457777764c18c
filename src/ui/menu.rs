//! Card menus: landing page and analysis tier selection

use crate::app::App;
use crate::state::{View, PAID_ANALYSIS_FEATURES, PAID_ANALYSIS_PRICE};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CARD_HEIGHT: u16 = 12;
const CONTACT_EMAIL: &str = "cs@theseeker.co.kr";

/// Heading and tagline shown above the cards
fn intro(view: View) -> (&'static str, &'static str) {
    match view {
        View::AnalysisSelection => (
            "견적 분석 서비스",
            "받으신 견적서가 적정한지 확인하고 싶으신가요? 원하시는 분석 방식을 선택하세요.",
        ),
        _ => (
            "건설 견적, 이제 믿고 맡기세요",
            "견적서 분석부터 검증된 협력사 연결까지 The Seeker가 함께합니다.",
        ),
    }
}

/// Heading, body lines and accent color of a card
fn card_content(target: View) -> (String, Vec<&'static str>, Color) {
    match target {
        View::AnalysisSelection => (
            "견적 분석 서비스".to_string(),
            vec!["견적서 AI 분석", "숨겨진 비용 찾기", "상세 분석 리포트"],
            Color::Cyan,
        ),
        View::PartnerRequest => (
            "협력사 서비스".to_string(),
            vec![
                "검증된 협력사 매칭",
                "투명한 견적, 초과금 없는 계약",
                "법적 A/S와 담보된 이행보증금",
            ],
            Color::Green,
        ),
        View::FreeAnalysis => (
            "무료 견적 분석".to_string(),
            vec![
                "기본 견적서 검토",
                "견적서 등급 심사",
                "간단한 분석 리포트",
                "24시간 내 결과 제공",
            ],
            Color::Cyan,
        ),
        View::PaidAnalysis => (
            format!("책임 분석 ({PAID_ANALYSIS_PRICE})"),
            PAID_ANALYSIS_FEATURES.to_vec(),
            Color::Yellow,
        ),
        View::Landing => (String::new(), Vec::new(), Color::White),
    }
}

/// Draw the card menu of the current view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.state.current_view();
    let cards = view.menu();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),           // Intro
            Constraint::Length(CARD_HEIGHT), // Cards
            Constraint::Min(0),
            Constraint::Length(1), // Contact
        ])
        .margin(1)
        .split(inner);

    let (heading, tagline) = intro(view);
    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            heading,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(tagline, Style::default().fg(Color::Gray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len().max(1) as u32))
        .collect();
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .spacing(2)
        .split(chunks[1]);

    for (idx, target) in cards.iter().enumerate() {
        let is_selected = idx == app.state.selected_index;
        draw_card(frame, card_areas[idx], idx + 1, *target, is_selected);
    }

    let contact = Paragraph::new(format!("문의: {CONTACT_EMAIL}"))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(contact, chunks[3]);
}

/// Draw a single card
fn draw_card(frame: &mut Frame, area: Rect, number: usize, target: View, is_selected: bool) {
    let (heading, body, accent) = card_content(target);

    let border_style = if is_selected {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("[{number}] "), Style::default().fg(Color::DarkGray)),
            Span::styled(
                heading,
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];
    lines.extend(body.into_iter().map(|item| Line::from(format!("• {item}"))));

    if is_selected {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Enter ▶",
            Style::default().fg(accent),
        )));
    }

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}
