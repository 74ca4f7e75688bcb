//! Utility functions for rule implementations.

pub mod paths;

#[doc(inline)]
pub use paths::{find_upwards, is_in_node_modules, is_relative_specifier, join_specifier};
