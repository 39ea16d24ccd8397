//! # Metric Names
//!
//! Dotted metric names built from segments. Segments that are absent or empty
//! are dropped, and the host framework's `::` namespace separator is rewritten
//! to `.` so names like `Billing::InvoiceJob` stay well-formed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between metric name segments
pub const METRIC_DELIMITER: &str = ".";

/// Namespace separator used by worker type names
pub const NAMESPACE_DELIMITER: &str = "::";

/// A well-formed dotted metric name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricName(String);

impl MetricName {
    /// Join optional segments into a metric name.
    ///
    /// Every segment, the configured prefix and queue names included, has
    /// `::` rewritten to `.` and its empty dotted components dropped.
    ///
    /// ```
    /// use worker_statsd::MetricName;
    ///
    /// let name = MetricName::join([Some("a"), Some("b"), None, Some("c")]);
    /// assert_eq!(name.as_str(), "a.b.c");
    /// ```
    pub fn join<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let joined = segments
            .into_iter()
            .flatten()
            .map(normalize_segment)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(METRIC_DELIMITER);

        MetricName(joined)
    }

    /// Append a segment, ignoring it if it is empty
    pub fn child(&self, segment: &str) -> Self {
        Self::join([Some(self.as_str()), Some(segment)])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MetricName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for MetricName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Derive the metric-safe worker name from a worker identity (`Foo::Bar` -> `Foo.Bar`)
pub fn worker_name(identity: &str) -> String {
    identity.replace(NAMESPACE_DELIMITER, METRIC_DELIMITER)
}

fn normalize_segment(segment: &str) -> String {
    // Collapse empty components left over from leading/trailing/double dots
    worker_name(segment)
        .split(METRIC_DELIMITER)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(METRIC_DELIMITER)
}
