//! Measurement records and validation.

use std::panic::{self, AssertUnwindSafe};

use benchwatch_types::Unit;
use thiserror::Error;

use crate::check::Validator;

/// Aggregated end-of-test failure listing every invalid measurement.
///
/// This is the only error the test-execution context raises from the core:
/// individual validator failures are never surfaced immediately, only
/// collected at teardown.
#[derive(Debug, Error)]
#[error("Measurements failed validation:\n{}", .failures.join("\n"))]
pub struct MeasurementFailure {
    /// One rendered line per invalid measurement:
    /// `"{name}: {reason} ({value}{unit})"`.
    pub failures: Vec<String>,
}

/// One numeric sample taken during a test.
///
/// The value is immutable after creation; `valid`/`reason` are set exactly
/// once when [`validate`](Measurement::validate) runs at test teardown.
pub struct Measurement {
    name: String,
    value: f64,
    unit: Unit,
    validator: Option<Validator>,
    valid: Option<bool>,
    reason: Option<String>,
}

impl Measurement {
    /// Create a measurement. An empty name defaults to "unnamed".
    pub fn new(name: &str, value: f64, unit: Unit, validator: Option<Validator>) -> Self {
        Self {
            name: if name.is_empty() { "unnamed" } else { name }.to_string(),
            value,
            unit,
            validator,
            valid: None,
            reason: None,
        }
    }

    /// Measurement name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw sample value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Unit the value was recorded in.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Tri-state validity: `None` until validation runs.
    pub fn valid(&self) -> Option<bool> {
        self.valid
    }

    /// Failure reason, set only when invalid or on validator error.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Run the validator, once.
    ///
    /// No validator means the measurement is valid. A panicking validator
    /// never propagates: it degrades to a failed measurement with a
    /// "Validator error:" reason.
    pub fn validate(&mut self) {
        if self.valid.is_some() {
            return;
        }
        let Some(validator) = &self.validator else {
            self.valid = Some(true);
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| validator(self.value))) {
            Ok(verdict) => {
                self.valid = Some(verdict.ok);
                self.reason = if verdict.ok { None } else { verdict.reason };
            }
            Err(payload) => {
                self.valid = Some(false);
                self.reason = Some(format!("Validator error: {}", panic_detail(&*payload)));
            }
        }
    }

    /// Render this measurement as one line of an aggregated failure.
    pub fn failure_line(&self) -> String {
        format!(
            "{}: {} ({}{})",
            self.name,
            self.reason.as_deref().unwrap_or("invalid value"),
            self.value,
            self.unit
        )
    }
}

impl std::fmt::Debug for Measurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Measurement")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("unit", &self.unit.symbol)
            .field("valid", &self.valid)
            .field("reason", &self.reason)
            .finish()
    }
}

/// Validate every record and return the rendered failures.
///
/// Empty iff every record came out valid.
pub fn validate_all(records: &mut [Measurement]) -> Vec<String> {
    let mut failures = Vec::new();
    for record in records.iter_mut() {
        record.validate();
        if record.valid() == Some(false) {
            failures.push(record.failure_line());
        }
    }
    failures
}

fn panic_detail(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "validator panicked".to_string()
    }
}
