//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod menu;

use crate::app::App;
use crate::state::View;
use components::{render_error_dialog, render_success_dialog};
use ratatui::Frame;
use std::time::Instant;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    let view = app.state.current_view();
    match view {
        View::Landing | View::AnalysisSelection => menu::draw(frame, main_area, app),
        View::PaidAnalysis if !app.state.navigator.payment.is_form_entry() => {
            forms::draw_payment(frame, main_area, app, Instant::now())
        }
        View::FreeAnalysis | View::PaidAnalysis | View::PartnerRequest => {
            forms::draw_request_form(frame, main_area, app)
        }
    }

    layout::draw_status_bar(frame, app);

    // Dialogs render on top; errors take precedence
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    } else if let Some(dialog) = &app.state.success_dialog {
        render_success_dialog(frame, &dialog.title, &dialog.message);
    }
}
