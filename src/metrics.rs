use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use utoipa::ToSchema;

/// Latency samples kept per path
pub const MAX_SAMPLES: usize = 1000;

/// Metrics key shared by requests that matched no route
pub const UNMATCHED_PATH: &str = "<unmatched>";

/// Counters and recent latencies of a single path.
#[derive(Debug, Default)]
struct PathMetrics {
    latencies_ms: VecDeque<u64>,
    requests: u64,
    failures: u64,
}

impl PathMetrics {
    fn record(&mut self, latency_ms: u64, ok: bool) {
        self.requests += 1;
        if !ok {
            self.failures += 1;
        }
        if self.latencies_ms.len() == MAX_SAMPLES {
            self.latencies_ms.pop_front();
        }
        self.latencies_ms.push_back(latency_ms);
    }

    fn snapshot(&self) -> PathSnapshot {
        let mut sorted: Vec<u64> = self.latencies_ms.iter().copied().collect();
        sorted.sort_unstable();

        PathSnapshot {
            requests: self.requests,
            failures: self.failures,
            failure_rate: if self.requests == 0 {
                0.0
            } else {
                self.failures as f64 / self.requests as f64
            },
            p50_ms: percentile(&sorted, 50.0),
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
            median_ms: median(&sorted),
            samples: sorted.len(),
        }
    }
}

/// Nearest-rank percentile over sorted samples, index rounded half to even.
fn percentile(sorted: &[u64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let idx = (p / 100.0 * last as f64).round_ties_even() as usize;
    Some(sorted[idx.min(last)] as f64)
}

fn median(sorted: &[u64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    }
}

/// Point-in-time statistics of one path (or of all paths combined)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PathSnapshot {
    /// Number of requests served
    pub requests: u64,
    /// Requests answered with a status outside 200..400
    pub failures: u64,
    pub failure_rate: f64,
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub median_ms: Option<f64>,
    /// Latency samples the percentiles are computed from
    pub samples: usize,
}

/// Body of `GET /api/metrics-lite`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MetricsSnapshot {
    pub overall: PathSnapshot,
    pub by_path: BTreeMap<String, PathSnapshot>,
}

/// In-process request metrics keyed by route template.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    paths: Mutex<HashMap<String, PathMetrics>>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finished request.
    pub fn record(&self, path: &str, latency_ms: u64, ok: bool) {
        let mut paths = self.paths.lock();
        match paths.get_mut(path) {
            Some(metrics) => metrics.record(latency_ms, ok),
            None => {
                let mut metrics = PathMetrics::default();
                metrics.record(latency_ms, ok);
                paths.insert(path.to_string(), metrics);
            }
        }
    }

    /// Snapshot of every path plus an approximate overall view.
    ///
    /// The overall entry sums the counters exactly. Its latencies are a pool of
    /// at most [`MAX_SAMPLES`] samples drawn from the per-path rings in map
    /// order, so which samples survive is arbitrary.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let paths = self.paths.lock();

        let mut overall = PathMetrics::default();
        for metrics in paths.values() {
            overall.requests += metrics.requests;
            overall.failures += metrics.failures;
            for &latency in &metrics.latencies_ms {
                if overall.latencies_ms.len() == MAX_SAMPLES {
                    overall.latencies_ms.pop_front();
                }
                overall.latencies_ms.push_back(latency);
            }
        }

        let by_path = paths
            .iter()
            .map(|(path, metrics)| (path.clone(), metrics.snapshot()))
            .collect();

        MetricsSnapshot {
            overall: overall.snapshot(),
            by_path,
        }
    }
}
