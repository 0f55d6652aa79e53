//! Cryptographic utilities: claim message binding and signer recovery

mod recover;

pub use recover::*;
