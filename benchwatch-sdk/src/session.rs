//! Per-test measurement sessions.

use benchwatch_types::Unit;
use tracing::debug;

use crate::bench::Bench;
use crate::check::Validator;
use crate::measure::{self, Measurement, MeasurementFailure};

/// The measurement scope for one test.
///
/// Created by [`Bench::session`] at test setup (which resets the test's
/// timeline); collects measurements during the test body; validated exactly
/// once at teardown by [`finish`](TestSession::finish), which fails the test
/// iff any measurement came out invalid.
///
/// Recording never suspends: each sample is stamped onto the timeline and
/// broadcast, and validation is deferred to teardown.
#[derive(Debug)]
pub struct TestSession {
    bench: Bench,
    test_id: String,
    records: Vec<Measurement>,
}

impl TestSession {
    pub(crate) fn new(bench: Bench, test_id: &str) -> Self {
        Self {
            bench,
            test_id: test_id.to_string(),
            records: Vec::new(),
        }
    }

    /// Identity of the test this session belongs to.
    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    /// Record one sample.
    ///
    /// An empty `name` defaults to "unnamed"; `None` for `validator` means
    /// the sample is unconditionally valid at teardown.
    pub fn record(&mut self, name: &str, value: f64, unit: Unit, validator: Option<Validator>) {
        let record = Measurement::new(name, value, unit, validator);
        self.bench
            .record_tick(&self.test_id, record.name(), value, &unit);
        self.records.push(record);
    }

    /// Record an unnamed sample. Shorthand for [`record`](Self::record).
    pub fn measure(&mut self, value: f64, unit: Unit, validator: Option<Validator>) {
        self.record("", value, unit, validator);
    }

    /// Number of samples recorded so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no samples were recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The records collected so far.
    pub fn records(&self) -> &[Measurement] {
        &self.records
    }

    /// Validate every collected measurement.
    ///
    /// Consuming `self` makes the teardown check run exactly once. Returns
    /// the aggregated failure listing every invalid measurement, or `Ok` if
    /// all were valid (a test with zero invalid measurements passes this
    /// stage).
    pub fn finish(mut self) -> Result<(), MeasurementFailure> {
        let failures = measure::validate_all(&mut self.records);
        debug!(
            test = self.test_id,
            records = self.records.len(),
            failures = failures.len(),
            "session finished"
        );
        if failures.is_empty() {
            Ok(())
        } else {
            Err(MeasurementFailure { failures })
        }
    }
}
