//! Simulated payment confirmation for the paid analysis tier
//!
//! There is no payment gateway behind this: the user confirms the transfer
//! and, after a fixed delay, the form is unlocked.

use std::time::{Duration, Instant};

/// Price shown on the payment screen and sent with the request
pub const PAID_ANALYSIS_PRICE: &str = "70,000원";

/// Bank transfer details shown on the payment screen
pub const PAYMENT_ACCOUNT: &str = "우리은행 / 1005-304-766991 / 브이엠에스홀딩스";

/// Services included in the paid tier
pub const PAID_ANALYSIS_FEATURES: &[&str] = &[
    "전문가 1:1 맞춤 분석",
    "상세 분석 리포트 제공",
    "협력사 계약 무조건 5% 할인",
    "24시간 내 결과 제공",
    "견적서 5% 이상 금액 발생 시 저희가 100% 부담",
];

/// Sub-state of the paid analysis view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStep {
    #[default]
    AwaitingConfirmation,
    /// User confirmed; waiting out the artificial delay
    Confirming { started: Instant },
    FormEntry,
}

/// Payment step tracker
#[derive(Debug, Clone, Default)]
pub struct PaymentState {
    pub step: PaymentStep,
}

impl PaymentState {
    /// Delay between "입금 완료" and the form becoming available
    pub const SIMULATED_CONFIRMATION_DELAY: Duration = Duration::from_millis(2000);

    pub fn new() -> Self {
        Self::default()
    }

    /// Start the simulated confirmation. Returns false if already started.
    pub fn confirm(&mut self, now: Instant) -> bool {
        if self.step != PaymentStep::AwaitingConfirmation {
            return false;
        }
        self.step = PaymentStep::Confirming { started: now };
        true
    }

    /// Advance once the delay has elapsed. Returns true on the transition.
    pub fn update(&mut self, now: Instant) -> bool {
        if let PaymentStep::Confirming { started } = self.step {
            if now.saturating_duration_since(started) >= Self::SIMULATED_CONFIRMATION_DELAY {
                self.step = PaymentStep::FormEntry;
                return true;
            }
        }
        false
    }

    /// Eased progress of the confirmation (0.0 to 1.0)
    pub fn progress(&self, now: Instant) -> f32 {
        match self.step {
            PaymentStep::AwaitingConfirmation => 0.0,
            PaymentStep::Confirming { started } => {
                let elapsed = now.saturating_duration_since(started).as_secs_f32();
                let linear = (elapsed / Self::SIMULATED_CONFIRMATION_DELAY.as_secs_f32()).min(1.0);
                simple_easing::cubic_out(linear)
            }
            PaymentStep::FormEntry => 1.0,
        }
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.step, PaymentStep::Confirming { .. })
    }

    pub fn is_form_entry(&self) -> bool {
        self.step == PaymentStep::FormEntry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_awaits_confirmation() {
        let state = PaymentState::new();
        assert_eq!(state.step, PaymentStep::AwaitingConfirmation);
        assert!(!state.is_form_entry());
        assert_eq!(state.progress(Instant::now()), 0.0);
    }

    #[test]
    fn test_update_without_confirm_does_nothing() {
        let mut state = PaymentState::new();
        assert!(!state.update(Instant::now() + Duration::from_secs(10)));
        assert_eq!(state.step, PaymentStep::AwaitingConfirmation);
    }

    #[test]
    fn test_stays_confirming_before_delay() {
        let start = Instant::now();
        let mut state = PaymentState::new();
        assert!(state.confirm(start));

        assert!(!state.update(start + Duration::from_millis(1999)));
        assert!(state.is_confirming());
    }

    #[test]
    fn test_advances_after_delay() {
        let start = Instant::now();
        let mut state = PaymentState::new();
        state.confirm(start);

        assert!(state.update(start + PaymentState::SIMULATED_CONFIRMATION_DELAY));
        assert!(state.is_form_entry());
        // Only transitions once
        assert!(!state.update(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_confirm_is_not_restartable() {
        let start = Instant::now();
        let mut state = PaymentState::new();
        state.confirm(start);
        assert!(!state.confirm(start + Duration::from_millis(500)));
        assert_eq!(state.step, PaymentStep::Confirming { started: start });
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        let start = Instant::now();
        let mut state = PaymentState::new();
        state.confirm(start);

        let early = state.progress(start + Duration::from_millis(200));
        let late = state.progress(start + Duration::from_millis(1800));
        let past = state.progress(start + Duration::from_secs(3));

        assert!(early > 0.0);
        assert!(late > early);
        assert_eq!(past, 1.0);
    }
}
