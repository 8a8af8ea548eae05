//! Result model: the normalized form of one analysis response.

pub mod adapter;
pub mod types;

pub use adapter::{adapt_result, parse_result};
pub use types::*;
