//! Per-stage counters, mirroring the original pipeline's `update_metrics`
//! callback: each stage returns its own small counter set instead of
//! mutating a shared dictionary.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StageMetrics {
    pub input_count: usize,
    pub output_count: usize,
    pub rejected_count: usize,
    pub invariant_violations: usize,
}

impl StageMetrics {
    pub fn new(input_count: usize) -> Self {
        Self {
            input_count,
            ..Default::default()
        }
    }

    pub fn record_output(&mut self, n: usize) {
        self.output_count += n;
    }

    pub fn record_rejected(&mut self, n: usize) {
        self.rejected_count += n;
    }

    pub fn record_invariant_violation(&mut self) {
        self.invariant_violations += 1;
    }
}

/// Totals surfaced in the Stage-B artifact, mirroring the worker's
/// top-level `totals` block.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Totals {
    pub lines_considered: usize,
    pub pairs_emitted: usize,
    pub pairs_rejected: usize,
}
