//! Form rendering module
//!
//! This module contains UI components for rendering forms:
//! - `field_renderer`: Field rendering utilities
//! - `request_form`: The three request forms
//! - `payment`: Payment step shown before the paid analysis form

mod field_renderer;
mod payment;
mod request_form;

pub use payment::draw_payment;
pub use request_form::draw_request_form;
