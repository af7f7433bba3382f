//! Refresh health metrics collection and reporting
//!
//! Tracks latency percentiles, success rate and failure kinds for price refreshes.

use crate::error::FetchError;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// Maximum number of samples to keep for metrics calculation
const MAX_SAMPLES: usize = 100;

/// Summary of refresh attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshMetrics {
    /// 50th percentile latency of successful refreshes in milliseconds
    pub latency_p50_ms: f64,
    /// 99th percentile latency of successful refreshes in milliseconds
    pub latency_p99_ms: f64,
    /// Success rate (0.0 to 1.0)
    pub success_rate: f64,
    /// Total number of refreshes attempted
    pub total_refreshes: u64,
    /// Number of failed refreshes
    pub failed_refreshes: u64,
    /// Failed refreshes keyed by [`FetchError::kind`]
    pub failures_by_kind: HashMap<&'static str, u64>,
}

impl RefreshMetrics {
    /// Creates metrics with no data
    pub fn empty() -> Self {
        Self {
            latency_p50_ms: 0.0,
            latency_p99_ms: 0.0,
            success_rate: 1.0,
            total_refreshes: 0,
            failed_refreshes: 0,
            failures_by_kind: HashMap::new(),
        }
    }
}

/// Internal sample for latency tracking
#[derive(Debug, Clone)]
struct LatencySample {
    duration_ms: f64,
    success: bool,
}

#[derive(Debug, Default)]
struct CollectorState {
    samples: VecDeque<LatencySample>,
    total: u64,
    failed: u64,
    failures_by_kind: HashMap<&'static str, u64>,
}

/// Collects and computes refresh metrics
#[derive(Debug, Default)]
pub struct MetricsCollector {
    state: RwLock<CollectorState>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one refresh attempt and its outcome
    pub async fn record_refresh(&self, duration_ms: u32, outcome: Result<(), &FetchError>) {
        let mut state = self.state.write().await;
        state.total += 1;

        if let Err(e) = outcome {
            state.failed += 1;
            *state.failures_by_kind.entry(e.kind()).or_insert(0) += 1;
        }

        if state.samples.len() >= MAX_SAMPLES {
            state.samples.pop_front();
        }
        state.samples.push_back(LatencySample {
            duration_ms: f64::from(duration_ms),
            success: outcome.is_ok(),
        });
    }

    /// Computes current metrics from collected samples
    pub async fn get_metrics(&self) -> RefreshMetrics {
        let state = self.state.read().await;

        if state.samples.is_empty() {
            return RefreshMetrics::empty();
        }

        let mut latencies: Vec<f64> = state
            .samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.duration_ms)
            .collect();

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        RefreshMetrics {
            latency_p50_ms: percentile(&latencies, 50.0),
            latency_p99_ms: percentile(&latencies, 99.0),
            success_rate: (state.total - state.failed) as f64 / state.total as f64,
            total_refreshes: state.total,
            failed_refreshes: state.failed,
            failures_by_kind: state.failures_by_kind.clone(),
        }
    }
}

/// Nearest-rank percentile of sorted values
fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let len = sorted_values.len();
    let rank = (p / 100.0 * len as f64).ceil().max(1.0) as usize;
    sorted_values[rank.min(len) - 1]
}
