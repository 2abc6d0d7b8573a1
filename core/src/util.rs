//! Various utility types and functions.

pub use error::{Error, Result};

pub mod buf;
pub mod error;
pub mod rect;
