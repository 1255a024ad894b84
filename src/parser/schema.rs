//! Input schema of one XHProf trace log line.
//!
//! Each line of a log is one JSON object:
//!
//! ```text
//! {"data":{"main()":{"ct":1,"wt":1200},"main()==>foo":{"ct":3,"wt":400}},"request":"/index.php","totalTime":0.0012}
//! ```

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Timing of one request as written by the profiler
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceRecord {
    /// Path or identifier of the profiled request
    pub request: String,

    /// Wall-clock seconds for the whole request
    #[serde(rename = "totalTime")]
    pub total_time: f64,

    /// Per-call-path counters, in document order
    #[serde(deserialize_with = "samples_in_order")]
    pub data: Vec<(String, CallSample)>,
}

/// Counters of one call-path within a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CallSample {
    /// Number of times the path was entered
    #[serde(rename = "ct")]
    pub called_times: u64,

    /// Wall time spent in the path, in profiler micro-units
    #[serde(rename = "wt")]
    pub wall_time: u64,
}

/// Collect the `data` object as an ordered list so that first-seen
/// order of call-paths follows the log, not a map's key order.
fn samples_in_order<'de, D>(deserializer: D) -> Result<Vec<(String, CallSample)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SamplesVisitor;

    impl<'de> Visitor<'de> for SamplesVisitor {
        type Value = Vec<(String, CallSample)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of call-path names to {ct, wt} counters")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut samples = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((path, sample)) = map.next_entry::<String, CallSample>()? {
                samples.push((path, sample));
            }
            Ok(samples)
        }
    }

    deserializer.deserialize_map(SamplesVisitor)
}
