//! Test result records - the final state of one executed test.

/// Final outcome of a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    /// The test has not finished (or its result was never reported).
    #[default]
    Unknown,
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
}

/// The result record for one test, as produced by the reporting layer.
///
/// The core does not own the report file format; it stores the latest record
/// and broadcasts it to observers so dashboards can show the most recent
/// result. Metadata fields (name, description, requirements, steps) come from
/// test annotations collected by the test runner.
///
/// # Example
///
/// ```rust
/// use benchwatch_types::{Outcome, TestResultRecord};
///
/// let record = TestResultRecord::builder("test_led")
///     .name("LED")
///     .description("Ensure the LED can be toggled via GPIO")
///     .requirement("REQ-FW-001")
///     .step("Operator confirms LED status")
///     .outcome(Outcome::Passed)
///     .build();
///
/// assert_eq!(record.outcome, Outcome::Passed);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestResultRecord {
    /// Stable test identity (e.g. the runner's node id).
    pub id: String,
    /// Human-readable test name.
    pub name: String,
    /// What the test verifies.
    pub description: String,
    /// Requirement ids the test covers.
    pub requirements: Vec<String>,
    /// Procedure steps.
    pub steps: Vec<String>,
    /// Final outcome.
    #[cfg_attr(feature = "serde", serde(default))]
    pub outcome: Outcome,
    /// Failure detail, present only when the test failed.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub failure_reason: Option<String>,
}

impl TestResultRecord {
    /// Create a builder for a record with the given test identity.
    pub fn builder(id: impl Into<String>) -> TestResultRecordBuilder {
        TestResultRecordBuilder {
            record: TestResultRecord {
                id: id.into(),
                ..Default::default()
            },
        }
    }

    /// Whether the record carries a settled (non-unknown) outcome.
    pub fn is_settled(&self) -> bool {
        self.outcome != Outcome::Unknown
    }
}

/// Builder for [`TestResultRecord`].
#[derive(Debug)]
pub struct TestResultRecordBuilder {
    record: TestResultRecord,
}

impl TestResultRecordBuilder {
    /// Set the human-readable name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    /// Add a covered requirement id.
    pub fn requirement(mut self, req: impl Into<String>) -> Self {
        self.record.requirements.push(req.into());
        self
    }

    /// Add a procedure step.
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.record.steps.push(step.into());
        self
    }

    /// Set the final outcome.
    pub fn outcome(mut self, outcome: Outcome) -> Self {
        self.record.outcome = outcome;
        self
    }

    /// Set the failure detail and mark the record failed.
    pub fn failed(mut self, reason: impl Into<String>) -> Self {
        self.record.outcome = Outcome::Failed;
        self.record.failure_reason = Some(reason.into());
        self
    }

    /// Finish building the record.
    pub fn build(self) -> TestResultRecord {
        self.record
    }
}
