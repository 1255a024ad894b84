//! Aggregate rows built from trace records.
//!
//! Averages are always recomputed from the cumulative totals,
//! never estimated incrementally.

use crate::parser::CallSample;

/// Cumulative statistics of one call-path across all requests
#[derive(Debug, Clone, PartialEq)]
pub struct CallAggregate {
    /// Call-path name
    pub path: String,

    pub total_called_times: u64,
    pub max_called_times: u64,
    pub min_called_times: u64,
    pub avg_called_times: f64,

    /// Wall time, in profiler micro-units
    pub total_time: u64,
    pub max_time: u64,
    pub min_time: u64,
    pub avg_time: f64,

    /// Number of request records containing this path
    pub requests: u64,

    /// Number of distinct requests touching this path
    pub request_coverage: u64,
}

impl CallAggregate {
    /// Seed a call-path from its first occurrence
    pub fn new(path: impl Into<String>, sample: CallSample) -> Self {
        Self {
            path: path.into(),
            total_called_times: sample.called_times,
            max_called_times: sample.called_times,
            min_called_times: sample.called_times,
            avg_called_times: sample.called_times as f64,
            total_time: sample.wall_time,
            max_time: sample.wall_time,
            min_time: sample.wall_time,
            avg_time: sample.wall_time as f64,
            requests: 1,
            request_coverage: 1,
        }
    }

    /// Fold one more occurrence
    ///
    /// `new_request` is false when this path was already counted for the
    /// record being folded, so coverage is not inflated.
    pub fn add(&mut self, sample: CallSample, new_request: bool) {
        if new_request {
            self.requests += 1;
            self.request_coverage += 1;
        }

        // Totals clamp at u64::MAX
        self.total_called_times = self.total_called_times.saturating_add(sample.called_times);
        self.total_time = self.total_time.saturating_add(sample.wall_time);

        self.max_called_times = self.max_called_times.max(sample.called_times);
        self.min_called_times = self.min_called_times.min(sample.called_times);
        self.max_time = self.max_time.max(sample.wall_time);
        self.min_time = self.min_time.min(sample.wall_time);

        self.avg_called_times = self.total_called_times as f64 / self.requests as f64;
        self.avg_time = self.total_time as f64 / self.requests as f64;
    }
}

/// Cumulative statistics of one request path
#[derive(Debug, Clone, PartialEq)]
pub struct RequestAggregate {
    /// Request path name
    pub path: String,

    /// Number of records for this request
    pub count: u64,

    /// Wall-clock seconds
    pub total_time: f64,
    pub max_time: f64,
    pub min_time: f64,
    pub avg_time: f64,
}

impl RequestAggregate {
    /// Seed a request from its first record
    pub fn new(path: impl Into<String>, total_time: f64) -> Self {
        Self {
            path: path.into(),
            count: 1,
            total_time,
            max_time: total_time,
            min_time: total_time,
            avg_time: total_time,
        }
    }

    /// Fold one more record
    pub fn add(&mut self, total_time: f64) {
        self.count += 1;
        self.total_time += total_time;
        self.max_time = self.max_time.max(total_time);
        self.min_time = self.min_time.min(total_time);
        self.avg_time = self.total_time / self.count as f64;
    }
}

/// Full output of an analysis
///
/// **Public** - owned by the caller, reports only borrow it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeResult {
    /// Call-paths in first-seen order
    pub calls: Vec<CallAggregate>,

    /// Requests in first-seen order
    pub requests: Vec<RequestAggregate>,

    /// Sum of every record's `totalTime`, in seconds
    pub total_time: f64,

    /// Sum of every `ct` across all records
    pub total_calls: u64,

    /// Number of records folded
    pub total_requests: u64,
}

impl AnalyzeResult {
    /// Grand total time in microseconds
    pub fn total_time_micros(&self) -> f64 {
        self.total_time * crate::utils::config::MICROS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ct: u64, wt: u64) -> CallSample {
        CallSample {
            called_times: ct,
            wall_time: wt,
        }
    }

    #[test]
    fn test_call_aggregate_add() {
        let mut call = CallAggregate::new("f", sample(2, 1000));
        call.add(sample(4, 200), true);

        assert_eq!(call.total_called_times, 6);
        assert_eq!(call.total_time, 1200);
        assert_eq!(call.max_called_times, 4);
        assert_eq!(call.min_called_times, 2);
        assert_eq!(call.max_time, 1000);
        assert_eq!(call.min_time, 200);
        assert_eq!(call.requests, 2);
        assert_eq!(call.avg_called_times, 3.0);
        assert_eq!(call.avg_time, 600.0);
    }

    #[test]
    fn test_call_aggregate_same_request() {
        let mut call = CallAggregate::new("f", sample(1, 10));
        call.add(sample(1, 10), false);

        assert_eq!(call.requests, 1);
        assert_eq!(call.request_coverage, 1);
        assert_eq!(call.total_called_times, 2);
        assert_eq!(call.avg_time, 20.0);
    }

    #[test]
    fn test_call_aggregate_totals_saturate() {
        let mut call = CallAggregate::new("f", sample(u64::MAX, u64::MAX - 1));
        call.add(sample(u64::MAX, 5), true);

        assert_eq!(call.total_called_times, u64::MAX);
        assert_eq!(call.total_time, u64::MAX);
        assert_eq!(call.max_called_times, u64::MAX);
        assert_eq!(call.min_time, 5);
    }

    #[test]
    fn test_request_aggregate_add() {
        let mut request = RequestAggregate::new("/a", 0.5);
        request.add(1.5);
        request.add(1.0);

        assert_eq!(request.count, 3);
        assert_eq!(request.total_time, 3.0);
        assert_eq!(request.max_time, 1.5);
        assert_eq!(request.min_time, 0.5);
        assert_eq!(request.avg_time, 1.0);
    }
}
