//! Scanner inputs and batch results.

#[cfg(test)]
#[path = "scan_test.rs"]
mod scan_test;

use listing::api::BatchScanItem;
pub use listing::api::{is_valid_upc, parse_batch};

/// Typed-in scanner state.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanState {
    pub upc: String,
    pub quantity: u32,
    /// One `upc[,quantity]` per line.
    pub batch_input: String,
    pub batch_results: Vec<BatchScanItem>,
    pub scanning: bool,
}

impl Default for ScanState {
    fn default() -> Self {
        Self { upc: String::new(), quantity: 1, batch_input: String::new(), batch_results: Vec::new(), scanning: false }
    }
}
