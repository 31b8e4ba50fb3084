//! Domain-level structures shared across the scanning pipeline.
//!
//! This module groups the recognition and layout records that cross the
//! system boundary.

pub mod blocks;

pub use blocks::{Block, Line, Token};
