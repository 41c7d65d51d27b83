//! Result types returned by search providers

mod types;

pub use types::*;
