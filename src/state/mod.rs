//! Application state module

mod app_state;
pub mod forms;
pub mod labels;
mod payment_state;

pub use app_state::*;
pub use forms::*;
pub use labels::LabelResolver;
pub use payment_state::*;
