//! The per-image scanning pipeline.

pub mod scanner;

pub use scanner::{DocScanner, ScanResult};
