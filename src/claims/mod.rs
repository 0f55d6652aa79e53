//! Claim authorization and the redeem flow

mod authorizer;
mod service;

pub use authorizer::*;
pub use service::*;
