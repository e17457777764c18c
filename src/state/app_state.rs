//! Application state definitions

use super::forms::{FormInstance, FormKind};
use super::payment_state::PaymentState;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Landing,
    AnalysisSelection,
    FreeAnalysis,
    PaidAnalysis,
    PartnerRequest,
}

impl View {
    /// Request form shown by this view
    pub fn form_kind(&self) -> Option<FormKind> {
        match self {
            View::FreeAnalysis => Some(FormKind::FreeAnalysis),
            View::PaidAnalysis => Some(FormKind::PaidAnalysis),
            View::PartnerRequest => Some(FormKind::PartnerRequest),
            View::Landing | View::AnalysisSelection => None,
        }
    }

    /// View reached by the "back" action
    pub fn parent(&self) -> View {
        match self {
            View::FreeAnalysis | View::PaidAnalysis => View::AnalysisSelection,
            View::Landing | View::AnalysisSelection | View::PartnerRequest => View::Landing,
        }
    }

    /// Whether a forward navigation from `self` to `target` exists
    pub fn can_open(&self, target: View) -> bool {
        matches!(
            (self, target),
            (View::Landing, View::AnalysisSelection)
                | (View::Landing, View::PartnerRequest)
                | (View::AnalysisSelection, View::FreeAnalysis)
                | (View::AnalysisSelection, View::PaidAnalysis)
        )
    }

    /// Cards offered by a menu page, in display order
    pub fn menu(&self) -> &'static [View] {
        match self {
            View::Landing => &[View::AnalysisSelection, View::PartnerRequest],
            View::AnalysisSelection => &[View::FreeAnalysis, View::PaidAnalysis],
            View::FreeAnalysis | View::PaidAnalysis | View::PartnerRequest => &[],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Landing => "The Seeker",
            View::AnalysisSelection => "견적 분석 서비스",
            View::FreeAnalysis => FormKind::FreeAnalysis.title(),
            View::PaidAnalysis => FormKind::PaidAnalysis.title(),
            View::PartnerRequest => FormKind::PartnerRequest.title(),
        }
    }
}

/// Selects which view is visible. No history is kept: "back" follows the
/// fixed parent of each view and "home" always returns to the landing page.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: View,
    /// Payment sub-state of the paid analysis view
    pub payment: PaymentState,
}

impl Navigator {
    pub fn current(&self) -> View {
        self.current
    }

    /// Open a view reachable from the current one. Returns false otherwise.
    pub fn open(&mut self, target: View) -> bool {
        if !self.current.can_open(target) {
            tracing::debug!(from = ?self.current, to = ?target, "Ignoring navigation");
            return false;
        }
        self.set(target);
        true
    }

    pub fn back(&mut self) {
        self.set(self.current.parent());
    }

    pub fn home(&mut self) {
        self.set(View::Landing);
    }

    fn set(&mut self, view: View) {
        if view == View::PaidAnalysis {
            self.payment = PaymentState::new();
        }
        tracing::debug!(from = ?self.current, to = ?view, "Navigate");
        self.current = view;
    }
}

/// Success dialog contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessDialog {
    pub title: String,
    pub message: String,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub navigator: Navigator,

    // Mounted request form (only while a form view is visible)
    pub form: Option<FormInstance>,

    // Card selection on the landing and analysis selection pages
    pub selected_index: usize,

    // Dialogs and messages
    pub error_queue: VecDeque<String>,
    pub success_dialog: Option<SuccessDialog>,
    pub status_message: Option<String>,
}

impl AppState {
    pub fn current_view(&self) -> View {
        self.navigator.current()
    }

    /// Open a view and mount a fresh form for it
    pub fn open(&mut self, view: View) -> bool {
        if !self.navigator.open(view) {
            return false;
        }
        self.remount();
        true
    }

    /// Go back to the parent view
    pub fn back(&mut self) {
        self.navigator.back();
        self.remount();
    }

    /// Return to the landing page
    pub fn home(&mut self) {
        self.navigator.home();
        self.remount();
    }

    /// Each form view owns a new, empty form instance
    fn remount(&mut self) {
        self.selected_index = 0;
        self.form = self.current_view().form_kind().map(FormInstance::new);
    }

    /// Queue an error message for the error dialog
    pub fn push_error(&mut self, message: String) {
        tracing::debug!(%message, "Queued error");
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        self.success_dialog = Some(SuccessDialog {
            title: "신청이 완료되었습니다".to_string(),
            message: message.into(),
        });
    }

    pub fn dismiss_success(&mut self) {
        self.success_dialog = None;
    }

    /// Move card selection (wraps over `count` cards)
    pub fn move_selection(&mut self, forward: bool, count: usize) {
        if count == 0 {
            return;
        }
        self.selected_index = if forward {
            (self.selected_index + 1) % count
        } else if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }
}
