//! Email relay client module
//!
//! Submissions leave the application through a third-party relay
//! (Web3Forms) that forwards multipart form posts as email.

mod client;
mod payload;
mod traits;

pub use client::{Web3FormsClient, DEFAULT_ENDPOINT};
pub use payload::{PayloadPart, RelayPayload};
pub use traits::{RelayClientTrait, RelayError, RelayResponse};

#[cfg(test)]
pub use traits::MockRelayClientTrait;
