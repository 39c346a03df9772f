//! Credits module: account balance lookup.

mod methods;
mod types;

pub use methods::{Credits, CREDITS_PATH};
pub use types::CreditsResponse;
